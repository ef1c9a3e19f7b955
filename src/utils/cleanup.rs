use crate::math::{Point, Real};

/// Given an index buffer, remove from `points` every point that is not indexed.
///
/// The relative order of the remaining points is preserved and the index
/// buffer is remapped accordingly.
pub fn remove_unused_points(points: &mut Vec<Point<Real>>, idx: &mut [[u32; 3]]) {
    let mut used = vec![false; points.len()];

    for tri in idx.iter() {
        for &i in tri {
            used[i as usize] = true;
        }
    }

    let mut remap = vec![u32::MAX; points.len()];
    let mut kept = 0;

    for i in 0..points.len() {
        if used[i] {
            points[kept] = points[i];
            remap[i] = kept as u32;
            kept += 1;
        }
    }

    points.truncate(kept);

    for tri in idx.iter_mut() {
        for i in tri.iter_mut() {
            *i = remap[*i as usize];
        }
    }
}
