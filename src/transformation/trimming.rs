use crate::math::{Point, Real};
use crate::query::{BoundaryPolicy, ContactPair, IntersectionCircle};
use crate::shape::{Clump, Sphere};
use crate::transformation::sphere_surface_points;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Removes from `points` every point inside of `sphere`.
///
/// Returns the number of points removed. Applying this twice with the same
/// sphere removes nothing the second time.
pub fn exclude_points_inside(
    points: &mut Vec<Point<Real>>,
    sphere: &Sphere,
    policy: BoundaryPolicy,
) -> usize {
    let len = points.len();
    points.retain(|pt| !sphere.contains_point(pt, policy));
    len - points.len()
}

/// Samples the boundary of every sphere of `clump` and removes the samples
/// hidden inside of a contacting sphere.
///
/// Each sphere first gets `samples_per_sphere` points on its boundary. Then,
/// for each contact pair, `circle_resolution` points sampled on the
/// intersection circle of both spheres are added to both of them. Finally,
/// every point of a sphere lying inside of any sphere it is in contact with
/// is removed.
///
/// The result is indexed like the spheres of the clump.
pub fn trim_clump_samples(
    clump: &Clump,
    contacts: &[ContactPair],
    samples_per_sphere: usize,
    circle_resolution: usize,
    policy: BoundaryPolicy,
) -> Vec<Vec<Point<Real>>> {
    let spheres = clump.spheres();
    let mut samples: Vec<_> = spheres
        .iter()
        .map(|s| sphere_surface_points(s, samples_per_sphere))
        .collect();
    let mut neighbors = vec![Vec::new(); spheres.len()];

    for pair in contacts {
        let (i, j) = (pair.0 as usize, pair.1 as usize);
        neighbors[i].push(j);
        neighbors[j].push(i);

        if let Some(circle) = IntersectionCircle::new(&spheres[i], &spheres[j]) {
            let circle_points = circle.sample(circle_resolution);
            samples[i].extend_from_slice(&circle_points);
            samples[j].extend_from_slice(&circle_points);
        }
    }

    let trim = |(i, points): (usize, &mut Vec<Point<Real>>)| {
        let removed: usize = neighbors[i]
            .iter()
            .map(|j| exclude_points_inside(points, &spheres[*j], policy))
            .sum();
        log::debug!(
            "Sphere {}: {} hidden samples removed, {} left.",
            i,
            removed,
            points.len()
        );
    };

    #[cfg(feature = "parallel")]
    samples.par_iter_mut().enumerate().for_each(trim);
    #[cfg(not(feature = "parallel"))]
    samples.iter_mut().enumerate().for_each(trim);

    samples
}
