use crate::math::{Point, Real, Vector};

/// Tests if an axis-aligned cube intersects a triangle.
///
/// The cube is given by its center and half edge length. This is a
/// separating-axis test over the 3 cube face normals, the triangle normal,
/// and the 9 cross products between cube axes and triangle edges. Touching
/// counts as intersecting.
pub fn intersection_test_cube_triangle(
    center: &Point<Real>,
    half_extent: Real,
    triangle: &[Point<Real>; 3],
) -> bool {
    let a = triangle[0] - center;
    let b = triangle[1] - center;
    let c = triangle[2] - center;

    // Cube face normals.
    for i in 0..3 {
        let min = a[i].min(b[i]).min(c[i]);
        let max = a[i].max(b[i]).max(c[i]);

        if min > half_extent || max < -half_extent {
            return false;
        }
    }

    let edges = [b - a, c - b, a - c];

    // Triangle normal.
    let normal = edges[0].cross(&edges[1]);
    if separated_along(&normal, &a, &b, &c, half_extent) {
        return false;
    }

    // Cube axes crossed with triangle edges.
    for axis in [Vector::x(), Vector::y(), Vector::z()] {
        for edge in &edges {
            let dir = axis.cross(edge);

            if separated_along(&dir, &a, &b, &c, half_extent) {
                return false;
            }
        }
    }

    true
}

fn separated_along(
    dir: &Vector<Real>,
    a: &Vector<Real>,
    b: &Vector<Real>,
    c: &Vector<Real>,
    half_extent: Real,
) -> bool {
    // A degenerate axis separates nothing.
    if dir.norm_squared() == 0.0 {
        return false;
    }

    let pa = dir.dot(a);
    let pb = dir.dot(b);
    let pc = dir.dot(c);
    let radius = half_extent * dir.abs().sum();

    pa.min(pb).min(pc) > radius || pa.max(pb).max(pc) < -radius
}
