use crate::math::{Point, Real};
use crate::shape::{Clump, Sphere, VoxelGrid};
use crate::transformation::DistanceField;
use crate::ClumpError;
use na::Point3;
use num::Zero;

/// Why the greedy packing loop stopped.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PackingTermination {
    /// The requested number of spheres was placed.
    TargetReached,
    /// The largest inscribed sphere left became smaller than the minimum radius.
    MinRadiusReached,
    /// No occupied voxel is left in the grid.
    GridExhausted,
}

/// The result of a greedy sphere packing.
#[derive(Clone, Debug, PartialEq)]
pub struct SpherePacking {
    /// The spheres placed, by non-increasing radius.
    pub clump: Clump,
    /// The reason the packing loop stopped.
    pub termination: PackingTermination,
}

impl SpherePacking {
    /// Did the packing stop before placing the requested number of spheres?
    ///
    /// This is a normal outcome, not an error.
    pub fn fewer_than_requested(&self) -> bool {
        self.termination != PackingTermination::TargetReached
    }
}

/// Approximates the occupied voxels of `grid` by at most `target_count` spheres.
///
/// Each iteration computes the distance field of the remaining occupied voxels,
/// places a sphere at the voxel farthest from any empty voxel, and clears the
/// voxels within `(1 - overlap)` times that sphere's radius. Among voxels with
/// the same maximal distance, the one farthest from the centroid of the initial
/// solid wins; remaining ties go to the first voxel in linear order.
///
/// The loop stops early, without error, when the grid becomes empty or when the
/// next sphere would have a radius smaller than `min_radius`. This threshold
/// is expressed in voxels, i.e., it is compared with the distance field before
/// scaling by the grid pitch. That last sphere is not part of the result.
///
/// The grid is modified in place: on return it contains the voxels left
/// uncovered by the carved spheres.
pub fn pack(
    grid: &mut VoxelGrid,
    target_count: usize,
    min_radius: Real,
    overlap: Real,
) -> Result<SpherePacking, ClumpError> {
    if !(0.0..1.0).contains(&overlap) {
        return Err(ClumpError::InvalidParameter(
            "the overlap fraction must be in [0, 1)",
        ));
    }
    if !(min_radius >= 0.0) {
        return Err(ClumpError::InvalidParameter(
            "the minimum radius must be a non-negative number",
        ));
    }

    let mut clump = Clump::default();

    let centroid = match grid.occupied_centroid() {
        Some(centroid) => centroid,
        None => {
            return Ok(SpherePacking {
                clump,
                termination: PackingTermination::GridExhausted,
            })
        }
    };

    while clump.num_spheres() < target_count {
        let field = DistanceField::new(grid);
        let max_sq_dist = field.max_squared_distance();

        if max_sq_dist.is_zero() {
            log::info!(
                "The grid was fully cleared using {} spheres.",
                clump.num_spheres()
            );
            return Ok(SpherePacking {
                clump,
                termination: PackingTermination::GridExhausted,
            });
        }

        let voxel_radius = max_sq_dist.sqrt();

        if voxel_radius < min_radius {
            log::info!(
                "The minimum radius has been met using {} spheres.",
                clump.num_spheres()
            );
            return Ok(SpherePacking {
                clump,
                termination: PackingTermination::MinRadiusReached,
            });
        }

        let radius = voxel_radius * grid.pitch();
        let voxel = select_voxel(grid, &field, max_sq_dist, &centroid);
        let sphere = Sphere::validated(clump.num_spheres(), grid.voxel_center(&voxel), radius)?;
        let cleared = grid.carve_ball(&voxel, (1.0 - overlap) * voxel_radius);

        log::debug!(
            "Placed sphere {} at {:?} with radius {} ({} voxels cleared).",
            clump.num_spheres(),
            sphere.center(),
            radius,
            cleared
        );

        clump.push(sphere);
    }

    Ok(SpherePacking {
        clump,
        termination: PackingTermination::TargetReached,
    })
}

/// Among the voxels with the squared distance `max_sq_dist`, selects the one
/// farthest from `centroid` (in voxel units), the first one in linear order
/// in case of ties.
fn select_voxel(
    grid: &VoxelGrid,
    field: &DistanceField,
    max_sq_dist: Real,
    centroid: &Point<Real>,
) -> Point3<u32> {
    let mut best = None;
    let mut best_sq_dist = -1.0;

    for (id, sq_dist) in field.squared_distances().iter().enumerate() {
        if *sq_dist != max_sq_dist {
            continue;
        }

        let voxel = grid.voxel_coords(id);
        let to_centroid = na::distance_squared(&voxel.map(|e| e as Real), centroid);

        if to_centroid > best_sq_dist {
            best = Some(voxel);
            best_sq_dist = to_centroid;
        }
    }

    // The maximum is attained by at least one voxel.
    best.unwrap_or_else(|| grid.voxel_coords(0))
}

#[cfg(test)]
mod test {
    use super::{pack, PackingTermination};
    use crate::math::{Point, Real};
    use crate::shape::VoxelGrid;
    use crate::ClumpError;
    use na::Point3;

    fn full_box(nx: u32, ny: u32, nz: u32) -> VoxelGrid {
        VoxelGrid::from_fn(Point3::new(nx, ny, nz), 0.5, Point::origin(), |_, _, _| true)
            .unwrap()
    }

    #[test]
    fn first_sphere_is_the_largest_inscribed_one() {
        let mut grid = full_box(9, 9, 9);
        let packing = pack(&mut grid, 1, 0.0, 0.0).unwrap();

        assert_eq!(packing.termination, PackingTermination::TargetReached);
        assert!(!packing.fewer_than_requested());

        let sphere = &packing.clump.spheres()[0];
        assert_relative_eq!(*sphere.center(), Point::new(2.0, 2.0, 2.0));
        assert_relative_eq!(sphere.radius(), 2.5);
    }

    #[test]
    fn ties_prefer_voxels_far_from_the_centroid() {
        // Along a long bar, every voxel on the middle line is at distance 2 of
        // the border, except near both ends.
        let mut grid = full_box(15, 3, 3);
        let packing = pack(&mut grid, 1, 0.0, 0.0).unwrap();
        let center = packing.clump.spheres()[0].center();

        // Both ends are equally far from the centroid: the first one wins.
        assert_relative_eq!(*center, Point::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn radii_never_increase() {
        let mut grid = VoxelGrid::from_fn(Point3::new(20, 12, 8), 0.25, Point::origin(), |i, j, _| {
            i < 14 || j < 6
        })
        .unwrap();
        let packing = pack(&mut grid, 30, 0.0, 0.3).unwrap();
        let radii = packing.clump.radii();

        assert!(!radii.is_empty());
        for w in radii.windows(2) {
            assert!(w[1] <= w[0]);
        }
    }

    #[test]
    fn stops_at_min_radius() {
        // The minimum radius is in voxels: with a pitch of 0.5, spheres
        // smaller than 1.0 in world units are rejected.
        let mut grid = full_box(9, 9, 9);
        let packing = pack(&mut grid, 100, 2.0, 0.0).unwrap();

        assert_eq!(packing.termination, PackingTermination::MinRadiusReached);
        assert!(packing.fewer_than_requested());
        assert!(!packing.clump.is_empty());
        assert!(packing
            .clump
            .spheres()
            .iter()
            .all(|s| s.radius() >= 1.0 as Real));
    }

    #[test]
    fn min_radius_ignores_the_pitch() {
        let mut grid =
            VoxelGrid::from_fn(Point3::new(9, 9, 9), 0.1, Point::origin(), |_, _, _| true)
                .unwrap();
        let packing = pack(&mut grid, 1, 2.0, 0.0).unwrap();

        assert_eq!(packing.termination, PackingTermination::TargetReached);
        assert_relative_eq!(packing.clump.spheres()[0].radius(), 0.5, epsilon = 1.0e-6);
    }

    #[test]
    fn empty_grid_gives_empty_clump() {
        let mut grid = VoxelGrid::new(Point3::new(4, 4, 4), 1.0, Point::origin()).unwrap();
        let packing = pack(&mut grid, 10, 0.0, 0.0).unwrap();

        assert!(packing.clump.is_empty());
        assert_eq!(packing.termination, PackingTermination::GridExhausted);
    }

    #[test]
    fn invalid_overlap_is_rejected() {
        let mut grid = full_box(3, 3, 3);
        assert!(matches!(
            pack(&mut grid, 1, 0.0, 1.0),
            Err(ClumpError::InvalidParameter(_))
        ));
        assert!(matches!(
            pack(&mut grid, 1, -1.0, 0.0),
            Err(ClumpError::InvalidParameter(_))
        ));
    }
}
