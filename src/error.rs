use crate::math::Real;
use crate::transformation::{ConvexHullError, ReconstructionError};

/// Errors that can occur while generating a clump or extracting its surface.
///
/// Packing that stops before the requested number of spheres is *not* an
/// error: see [`PackingTermination`](crate::transformation::PackingTermination).
#[derive(thiserror::Error, Debug)]
pub enum ClumpError {
    /// The input mesh or bounding box cannot be voxelized.
    ///
    /// This is reported before any voxel is allocated, e.g., for an empty mesh,
    /// an out-of-range triangle index, or a bounding box with a zero-length edge.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    /// A sphere has a non-finite center, or a radius that is not a strictly positive number.
    #[error("invalid sphere #{index}: center {center:?}, radius {radius}")]
    InvalidSphere {
        /// The index of the offending sphere in its clump.
        index: usize,
        /// The center of the offending sphere.
        center: [Real; 3],
        /// The radius of the offending sphere.
        radius: Real,
    },
    /// A configuration value is out of its documented range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// The trimmed point cloud could not be turned into a closed surface.
    #[error("surface reconstruction failed: {0}")]
    ReconstructionFailed(#[from] ReconstructionError),
    /// The surface of a single sphere could not be tessellated.
    #[error("sphere tessellation failed: {0}")]
    Tessellation(#[from] ConvexHullError),
    /// A line of a clump text file could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// The 1-based index of the line that failed to parse.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// An I/O error occurred while reading or writing a clump file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
