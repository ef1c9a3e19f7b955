use crate::math::{Point, Real};
use crate::shape::VoxelGrid;
use crate::transformation::{pack, SpherePacking};
use crate::{ClumpConfig, ClumpError};

/// Approximates the solid enclosed by a closed triangle mesh by a clump.
///
/// The mesh is voxelized with `config.voxel_divisions` voxels along the
/// shortest edge of its AABB, then greedily packed with at most
/// `config.sphere_count` spheres. The sphere centers are expressed in the frame
/// of the mesh.
pub fn generate_clump(
    points: &[Point<Real>],
    indices: &[[u32; 3]],
    config: &ClumpConfig,
) -> Result<SpherePacking, ClumpError> {
    config.validate()?;

    let mut grid = VoxelGrid::voxelize(points, indices, config.voxel_divisions)?;
    let num_occupied = grid.num_occupied();
    let packing = pack(
        &mut grid,
        config.sphere_count,
        config.min_radius,
        config.overlap,
    )?;

    log::debug!(
        "Packed {} spheres, {} of {} voxels left uncovered.",
        packing.clump.num_spheres(),
        grid.num_occupied(),
        num_occupied
    );

    Ok(packing)
}
