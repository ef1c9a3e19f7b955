use crate::math::Real;
use crate::query::{BoundaryPolicy, ContactPolicy};
use crate::ClumpError;

/// Parameters of clump generation and clump surface extraction.
///
/// This structure is only read by the top-level entry points
/// [`generate_clump`](crate::transformation::generate_clump) and
/// [`extract_surface`](crate::transformation::extract_surface). The
/// algorithms underneath take their parameters explicitly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(default))]
pub struct ClumpConfig {
    /// The maximum number of spheres to place.
    pub sphere_count: usize,
    /// Packing stops as soon as the largest inscribed sphere left has a
    /// radius smaller than this value, measured in voxels.
    pub min_radius: Real,
    /// The number of voxels along the shortest edge of the mesh's AABB.
    pub voxel_divisions: u32,
    /// Fraction in `[0, 1)` by which the carved region of each sphere is
    /// shrunk. `0` produces non-overlapping spheres.
    pub overlap: Real,
    /// The number of points sampled on the surface of each sphere when
    /// extracting the clump surface.
    pub samples_per_sphere: usize,
    /// The number of points sampled on each intersection circle between
    /// two contacting spheres.
    pub circle_resolution: usize,
    /// The predicate deciding whether two spheres are in contact.
    pub contact_policy: ContactPolicy,
    /// The predicate deciding whether a sample lying on a neighbor sphere is trimmed.
    pub trim_policy: BoundaryPolicy,
    /// The radius of the ball triangulating the surface of clumps whose
    /// spheres have no common interior point.
    ///
    /// If `None`, it is derived from the spacing of the surface samples.
    pub pivot_radius: Option<Real>,
}

impl Default for ClumpConfig {
    fn default() -> Self {
        Self {
            sphere_count: 20,
            min_radius: 0.0,
            voxel_divisions: 50,
            overlap: 0.0,
            samples_per_sphere: 200,
            circle_resolution: 100,
            contact_policy: ContactPolicy::default(),
            trim_policy: BoundaryPolicy::default(),
            pivot_radius: None,
        }
    }
}

impl ClumpConfig {
    /// Checks that every field is in its documented range.
    pub fn validate(&self) -> Result<(), ClumpError> {
        if !(self.overlap >= 0.0 && self.overlap < 1.0) {
            return Err(ClumpError::InvalidParameter("overlap must lie in [0, 1)"));
        }
        if !(self.min_radius >= 0.0) || !self.min_radius.is_finite() {
            return Err(ClumpError::InvalidParameter(
                "min_radius must be a finite non-negative number",
            ));
        }
        if self.voxel_divisions == 0 {
            return Err(ClumpError::InvalidParameter(
                "voxel_divisions must be at least 1",
            ));
        }
        if self.samples_per_sphere < 4 {
            return Err(ClumpError::InvalidParameter(
                "samples_per_sphere must be at least 4",
            ));
        }
        if self.circle_resolution == 0 {
            return Err(ClumpError::InvalidParameter(
                "circle_resolution must be at least 1",
            ));
        }
        if let Some(radius) = self.pivot_radius {
            if !(radius > 0.0 && radius.is_finite()) {
                return Err(ClumpError::InvalidParameter(
                    "pivot_radius must be a finite positive number",
                ));
            }
        }

        Ok(())
    }
}
