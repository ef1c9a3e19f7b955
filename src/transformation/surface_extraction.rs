use crate::math::{Point, Real};
use crate::query::{detect_contacts, ContactPair, IntersectionCircle};
use crate::shape::{Clump, SurfaceMesh};
use crate::transformation::{reconstruct_surface, trim_clump_samples, BallPivoting, RadialHull};
use crate::{ClumpConfig, ClumpError};
use na::RealField;

const MAX_ASCENT_STEPS: usize = 200;
// Ratio between the default pivoting ball radius and the sample spacing.
const PIVOT_RADIUS_FACTOR: Real = 1.5;

/// Computes a triangle mesh approximating the boundary of the union of the
/// spheres of `clump`.
///
/// Each sphere boundary is sampled with `config.samples_per_sphere` points, the
/// intersection circles of contacting spheres with `config.circle_resolution`
/// points, and the samples hidden inside of a contacting sphere are removed.
///
/// If the spheres share a common interior point, their union is star-shaped
/// around the [`deepest_common_point`], and the remaining distinct points are
/// triangulated by a [`RadialHull`] centered on it. The result is then closed.
/// Otherwise, the points are triangulated by [`BallPivoting`], guided by the
/// spheres of the clump, with a ball of radius `config.pivot_radius`. This
/// follows surfaces of any genus but may leave small holes.
pub fn extract_surface(clump: &Clump, config: &ClumpConfig) -> Result<SurfaceMesh, ClumpError> {
    config.validate()?;

    let contacts = detect_contacts(clump, config.contact_policy);
    let samples = trim_clump_samples(
        clump,
        &contacts,
        config.samples_per_sphere,
        config.circle_resolution,
        config.trim_policy,
    );
    let cloud: Vec<_> = samples.into_iter().flatten().collect();

    let mesh = match deepest_common_point(clump) {
        Some(center) => reconstruct_surface(&cloud, &RadialHull::with_center(center))?,
        None => {
            let radius = config
                .pivot_radius
                .unwrap_or_else(|| default_pivot_radius(clump, &contacts, config));
            log::debug!(
                "The spheres have no common point, pivoting a ball of radius {}.",
                radius
            );
            let reconstruction = BallPivoting::with_guide(radius, clump.clone());
            reconstruct_surface(&cloud, &reconstruction)?
        }
    };

    log::debug!(
        "Extracted a surface with {} vertices and {} triangles from {} contacts.",
        mesh.vertices.len(),
        mesh.faces.len(),
        contacts.len()
    );

    Ok(mesh)
}

/// A ball radius slightly larger than the largest spacing between the
/// samples of a sphere or of an intersection circle.
fn default_pivot_radius(clump: &Clump, contacts: &[ContactPair], config: &ClumpConfig) -> Real {
    let spheres = clump.spheres();
    let area_per_sample = 4.0 * Real::pi() / config.samples_per_sphere as Real;
    let sphere_spacing = clump.max_radius().unwrap_or(0.0) * area_per_sample.sqrt();
    let circle_spacing = contacts
        .iter()
        .filter_map(|pair| {
            IntersectionCircle::new(&spheres[pair.0 as usize], &spheres[pair.1 as usize])
        })
        .map(|circle| circle.radius * Real::two_pi() / config.circle_resolution as Real)
        .fold(0.0, Real::max);

    PIVOT_RADIUS_FACTOR * sphere_spacing.max(circle_spacing)
}

/// Finds a point strictly inside of every sphere of `clump`, as deep as possible.
///
/// This maximizes `min_i(r_i - |x - c_i|)` by subgradient ascent, starting from
/// the mean of the sphere centers. Returns `None` if the clump is empty or if
/// no point with a positive depth was found.
pub fn deepest_common_point(clump: &Clump) -> Option<Point<Real>> {
    let spheres = clump.spheres();
    let initial_step = clump.max_radius()?;

    let depth = |x: &Point<Real>| {
        spheres
            .iter()
            .map(|s| (s.radius() - na::distance(x, s.center()), s))
            .min_by(|a, b| a.0.total_cmp(&b.0))
    };

    let mut x = crate::utils::center(&clump.positions());
    let mut best = (x, -Real::MAX);

    for step in 0..MAX_ASCENT_STEPS {
        let (d, shallowest) = depth(&x)?;

        if d > best.1 {
            best = (x, d);
        }

        let Some(dir) = (shallowest.center() - x).try_normalize(0.0) else {
            // Already at the center of the limiting sphere.
            break;
        };

        x += dir * (initial_step / (step + 2) as Real);
    }

    (best.1 > 0.0).then_some(best.0)
}
