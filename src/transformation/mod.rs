//! Clump generation from meshes and surface reconstruction from clumps.

pub use self::ball_pivoting::BallPivoting;
pub use self::clump_generation::generate_clump;
pub use self::convex_hull::{convex_hull_idx, try_convex_hull, ConvexHullError};
pub use self::distance_field::DistanceField;
pub use self::sphere_packing::{pack, PackingTermination, SpherePacking};
pub use self::sphere_sampling::sphere_surface_points;
pub use self::surface_extraction::{deepest_common_point, extract_surface};
pub use self::surface_reconstruction::{
    dedup_points, reconstruct_surface, RadialHull, ReconstructionError, SurfaceReconstruction,
};
pub use self::trimming::{exclude_points_inside, trim_clump_samples};

mod ball_pivoting;
mod clump_generation;
mod convex_hull;
mod distance_field;
mod sphere_packing;
mod sphere_sampling;
mod surface_extraction;
mod surface_reconstruction;
mod trimming;
mod voxelization;

#[cfg(feature = "wavefront")]
mod wavefront;
