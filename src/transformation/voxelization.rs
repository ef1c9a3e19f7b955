use crate::math::{Point, Real};
use crate::query;
use crate::shape::VoxelGrid;
use crate::ClumpError;
use na::Point3;
use std::collections::VecDeque;

/// Number of empty voxels added on each side of the mesh bounding box.
const PADDING: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum VoxelValue {
    Undefined,
    OnSurface,
    OutsideSurface,
}

impl VoxelGrid {
    /// Voxelizes the solid enclosed by a closed triangle mesh.
    ///
    /// The voxel pitch is the length of the shortest edge of the mesh AABB
    /// divided by `divisions`. The grid covers the AABB plus two empty voxels
    /// on every side, and its voxel centers are expressed in the frame of the
    /// mesh.
    ///
    /// A voxel is occupied if its cube touches a triangle, or if it cannot be
    /// reached from the grid boundary without crossing such a voxel.
    ///
    /// Fails with [`ClumpError::InvalidGeometry`], before allocating any voxel,
    /// if the mesh is empty, has an out-of-bounds index or a non-finite
    /// coordinate, or if its AABB has a zero-length edge.
    pub fn voxelize(
        points: &[Point<Real>],
        indices: &[[u32; 3]],
        divisions: u32,
    ) -> Result<VoxelGrid, ClumpError> {
        if points.is_empty() || indices.is_empty() {
            return Err(ClumpError::InvalidGeometry("the mesh has no triangle"));
        }
        if indices.iter().flatten().any(|i| *i as usize >= points.len()) {
            return Err(ClumpError::InvalidGeometry(
                "a triangle index is out of bounds",
            ));
        }
        if points.iter().any(|p| p.iter().any(|e| !e.is_finite())) {
            return Err(ClumpError::InvalidGeometry(
                "the mesh has a non-finite coordinate",
            ));
        }
        if divisions == 0 {
            return Err(ClumpError::InvalidParameter(
                "the number of voxel divisions must be positive",
            ));
        }

        let mut mins = points[0];
        let mut maxs = points[0];

        for pt in points {
            mins = mins.inf(pt);
            maxs = maxs.sup(pt);
        }

        let extents = maxs - mins;
        let min_extent = extents.min();

        if !(min_extent > 0.0) {
            return Err(ClumpError::InvalidGeometry(
                "the mesh bounding box has a zero-length edge",
            ));
        }

        let pitch = min_extent / divisions as Real;
        let origin = mins - extents.map(|_| PADDING as Real * pitch);
        let dims: Point3<u32> = extents
            .map(|e| (e / pitch).ceil() as u32 + 1 + 2 * PADDING)
            .into();

        log::debug!(
            "Voxelizing {} triangles on a {}x{}x{} grid with pitch {}.",
            indices.len(),
            dims.x,
            dims.y,
            dims.z,
            pitch
        );

        let mut grid = VoxelGrid::new(dims, pitch, origin)?;
        let mut values = vec![VoxelValue::Undefined; grid.len()];

        mark_surface(&grid, points, indices, &mut values);
        mark_outside_surface(&grid, &mut values);

        for (id, value) in values.iter().enumerate() {
            if *value != VoxelValue::OutsideSurface {
                let ijk = grid.voxel_coords(id);
                grid.set_occupied(ijk.x, ijk.y, ijk.z, true);
            }
        }

        Ok(grid)
    }
}

fn mark_surface(
    grid: &VoxelGrid,
    points: &[Point<Real>],
    indices: &[[u32; 3]],
    values: &mut [VoxelValue],
) {
    let dims = grid.dims();
    let half_extent = grid.pitch() / 2.0;

    for idx in indices {
        let tri = idx.map(|i| points[i as usize]);

        // Find the range of voxels potentially intersecting the triangle.
        let mut ijk0 = dims.coords;
        let mut ijk1 = Point3::<u32>::origin().coords;

        for pt in &tri {
            let ijk = ((pt - grid.origin()) / grid.pitch()).map(|e| (e + 0.5).max(0.0) as u32);
            ijk0 = ijk0.inf(&ijk);
            ijk1 = ijk1.sup(&ijk);
        }

        ijk0.apply(|e| *e = e.saturating_sub(1));
        ijk1 = ijk1.map(|e| e + 2).inf(&dims.coords);

        for k in ijk0.z..ijk1.z {
            for j in ijk0.y..ijk1.y {
                for i in ijk0.x..ijk1.x {
                    let id = grid.voxel_index(i, j, k);

                    if values[id] == VoxelValue::Undefined {
                        let center = grid.voxel_center(&Point3::new(i, j, k));

                        if query::intersection_test_cube_triangle(&center, half_extent, &tri) {
                            values[id] = VoxelValue::OnSurface;
                        }
                    }
                }
            }
        }
    }
}

/// Flood-fills, from the grid boundary, every voxel that can be reached
/// through 6-connected non-surface voxels.
fn mark_outside_surface(grid: &VoxelGrid, values: &mut [VoxelValue]) {
    let dims = grid.dims();
    let mut queue = VecDeque::new();

    for (id, value) in values.iter_mut().enumerate() {
        let ijk = grid.voxel_coords(id);
        let on_boundary = (0..3).any(|a| ijk[a] == 0 || ijk[a] == dims[a] - 1);

        if on_boundary && *value == VoxelValue::Undefined {
            *value = VoxelValue::OutsideSurface;
            queue.push_back(ijk);
        }
    }

    while let Some(ijk) = queue.pop_front() {
        for axis in 0..3 {
            for forward in [false, true] {
                let mut neighbor = ijk;

                if forward && ijk[axis] + 1 < dims[axis] {
                    neighbor[axis] += 1;
                } else if !forward && ijk[axis] > 0 {
                    neighbor[axis] -= 1;
                } else {
                    continue;
                }

                let id = grid.voxel_index(neighbor.x, neighbor.y, neighbor.z);

                if values[id] == VoxelValue::Undefined {
                    values[id] = VoxelValue::OutsideSurface;
                    queue.push_back(neighbor);
                }
            }
        }
    }
}
