use clump3d_f64::math::{Point, Real};
use clump3d_f64::na::Point3;
use clump3d_f64::shape::{Sphere, VoxelGrid};
use clump3d_f64::transformation::{generate_clump, pack, PackingTermination};
use clump3d_f64::ClumpConfig;

fn full_box(n: u32) -> VoxelGrid {
    VoxelGrid::from_fn(Point3::new(n, n, n), 0.1, Point::origin(), |_, _, _| true).unwrap()
}

#[test]
fn sphere_mesh_clump() {
    let (points, indices) = Sphere::new(Point::origin(), 1.0)
        .unwrap()
        .to_trimesh(400)
        .unwrap();
    let config = ClumpConfig {
        sphere_count: 10,
        voxel_divisions: 20,
        overlap: 0.2,
        ..ClumpConfig::default()
    };
    let packing = generate_clump(&points, &indices, &config).unwrap();
    let spheres = packing.clump.spheres();

    assert_eq!(packing.termination, PackingTermination::TargetReached);
    assert_eq!(spheres.len(), 10);

    // The largest inscribed sphere is (almost) the sphere itself.
    assert!(spheres[0].radius() > 0.8 && spheres[0].radius() < 1.2);
    assert!(spheres[0].center().coords.norm() < 0.3);

    for w in spheres.windows(2) {
        assert!(w[1].radius() <= w[0].radius());
    }

    for s in spheres {
        assert!(s.radius() > 0.0);
        assert!(s.center().coords.norm() < 1.2);
    }
}

#[test]
fn min_radius_bounds_every_sphere() {
    // 2.5 voxels with a pitch of 0.1.
    let mut grid = full_box(12);
    let packing = pack(&mut grid, 50, 2.5, 0.0).unwrap();

    assert_eq!(packing.termination, PackingTermination::MinRadiusReached);
    assert!(packing.fewer_than_requested());
    assert!(packing.clump.spheres().iter().all(|s| s.radius() >= 0.25));
    assert!(packing.clump.min_radius().unwrap() >= 0.25);
}

#[test]
fn no_overlap_clears_everything_under_the_sphere() {
    let mut grid = full_box(11);
    let packing = pack(&mut grid, 1, 0.0, 0.0).unwrap();
    let sphere = &packing.clump.spheres()[0];

    for id in 0..grid.len() {
        let center = grid.voxel_center(&grid.voxel_coords(id));
        if clump3d_f64::na::distance(&center, sphere.center()) <= sphere.radius() {
            assert!(!grid.occupancy()[id]);
        }
    }
}

#[test]
fn large_overlap_barely_changes_the_grid() {
    let mut grid = full_box(11);
    let before = grid.num_occupied();
    let packing = pack(&mut grid, 1, 0.0, 0.99).unwrap();

    assert_eq!(packing.clump.num_spheres(), 1);
    // Only the voxel at the center of the sphere is carved.
    assert_eq!(grid.num_occupied(), before - 1);
}

#[test]
fn packing_is_deterministic() {
    let make = || {
        VoxelGrid::from_fn(Point3::new(16, 10, 7), 0.2, Point::new(1.0, 2.0, 3.0), |i, j, k| {
            (i as Real - 8.0).abs() + (j as Real - 5.0).abs() + (k as Real) < 12.0
        })
        .unwrap()
    };

    let mut grid1 = make();
    let mut grid2 = make();
    let a = pack(&mut grid1, 15, 0.0, 0.4).unwrap();
    let b = pack(&mut grid2, 15, 0.0, 0.4).unwrap();

    assert_eq!(a, b);
    assert_eq!(grid1, grid2);
}

#[test]
fn empty_grid_is_not_an_error() {
    let mut grid = VoxelGrid::new(Point3::new(5, 5, 5), 1.0, Point::origin()).unwrap();
    let packing = pack(&mut grid, 3, 0.0, 0.0).unwrap();

    assert!(packing.clump.is_empty());
    assert!(packing.fewer_than_requested());
}
