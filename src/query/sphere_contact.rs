use crate::math::Real;
use crate::shape::{Clump, Sphere};
use crate::utils::SortedPair;

/// The predicate deciding whether the boundaries of two spheres cross.
///
/// With `d` the distance between the sphere centers, and `r1`, `r2` their radii:
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ContactPolicy {
    /// `|r1 - r2| < d < r1 + r2`: tangent spheres and nested spheres are not in contact.
    #[default]
    Strict,
    /// `|r1 - r2| <= d <= r1 + r2`: tangent spheres are in contact.
    ///
    /// Concentric spheres are never in contact, even if their radii are equal.
    Touching,
}

/// The predicate deciding whether a point on the boundary of a sphere lies inside of it.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// `|p - c| < r`: points on the sphere boundary are outside.
    #[default]
    KeepBoundary,
    /// `|p - c| <= r`: points on the sphere boundary are inside.
    RemoveBoundary,
}

/// A pair of indices of contacting spheres of a clump. The first index is
/// always the smallest.
pub type ContactPair = SortedPair<u32>;

/// Tests if the boundaries of two spheres intersect.
///
/// This is symmetric: `sphere_contact(a, b, p) == sphere_contact(b, a, p)`.
#[inline]
pub fn sphere_contact(s1: &Sphere, s2: &Sphere, policy: ContactPolicy) -> bool {
    let d0 = na::distance(s1.center(), s2.center());
    let sum = s1.radius() + s2.radius();
    let diff = (s1.radius() - s2.radius()).abs();

    match policy {
        ContactPolicy::Strict => diff < d0 && d0 < sum,
        ContactPolicy::Touching => d0 > 0.0 && diff <= d0 && d0 <= sum,
    }
}

/// Tests if a point lies inside of a sphere.
#[inline]
pub fn sphere_contains_point(
    sphere: &Sphere,
    point: &crate::math::Point<Real>,
    policy: BoundaryPolicy,
) -> bool {
    let dist = na::distance(sphere.center(), point);

    match policy {
        BoundaryPolicy::KeepBoundary => dist < sphere.radius(),
        BoundaryPolicy::RemoveBoundary => dist <= sphere.radius(),
    }
}

/// Detects all the pairs of spheres of `clump` whose boundaries intersect.
///
/// This tests every unordered pair of spheres, so it is quadratic in the
/// number of spheres. The pairs are returned sorted in lexicographic order.
pub fn detect_contacts(clump: &Clump, policy: ContactPolicy) -> Vec<ContactPair> {
    let spheres = clump.spheres();
    let mut pairs = Vec::new();

    for i in 0..spheres.len() {
        for j in i + 1..spheres.len() {
            if sphere_contact(&spheres[i], &spheres[j], policy) {
                log::debug!("Spheres {} and {} are in contact.", i, j);
                pairs.push(ContactPair::new(i as u32, j as u32));
            }
        }
    }

    pairs
}
