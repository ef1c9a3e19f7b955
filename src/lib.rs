/*!
clump3d
=======

**clump3d** approximates a 3D solid, given as a closed triangle mesh, by a
*clump*: a small set of possibly-overlapping spheres whose union covers the
solid's volume. Clumps are typically used as rigid-body proxies in
discrete-element simulations.

The crate also reconstructs a single watertight surface mesh from a clump,
for visualisation or export.

The main entry points are:
- [`transformation::generate_clump`]: mesh → voxel grid → greedy sphere packing.
- [`transformation::pack`]: greedy sphere packing of an existing [`shape::VoxelGrid`].
- [`transformation::extract_surface`]: clump → trimmed point cloud → surface mesh.
- [`io`]: the `x,y,z,r` text format of clumps.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features are mutually exclusive.");

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub use self::config::ClumpConfig;
pub use self::error::ClumpError;

mod config;
mod error;
pub mod io;
pub mod query;
pub mod shape;
pub mod transformation;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, UnitVector3, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;

    /// The unit vector type.
    pub use UnitVector3 as UnitVector;
}
