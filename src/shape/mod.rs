//! Shapes manipulated by the clump generator: spheres, clumps, voxel grids
//! and triangulated surfaces.

pub use self::clump::Clump;
pub use self::sphere::Sphere;
pub use self::surface_mesh::SurfaceMesh;
pub use self::voxel_grid::VoxelGrid;

mod clump;
mod sphere;
mod surface_mesh;
mod voxel_grid;
