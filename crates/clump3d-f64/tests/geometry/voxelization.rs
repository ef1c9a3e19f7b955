use clump3d_f64::math::Point;
use clump3d_f64::shape::{Sphere, VoxelGrid};
use clump3d_f64::transformation::generate_clump;
use clump3d_f64::{ClumpConfig, ClumpError};

#[test]
fn zero_extent_mesh_is_invalid_geometry() {
    let points = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ];
    let indices = vec![[0, 1, 2], [0, 2, 1]];

    assert!(matches!(
        VoxelGrid::voxelize(&points, &indices, 10),
        Err(ClumpError::InvalidGeometry(_))
    ));
    assert!(matches!(
        generate_clump(&points, &indices, &ClumpConfig::default()),
        Err(ClumpError::InvalidGeometry(_))
    ));
}

#[test]
fn voxelized_sphere_volume() {
    let (points, indices) = Sphere::new(Point::new(3.0, -1.0, 2.0), 2.0)
        .unwrap()
        .to_trimesh(500)
        .unwrap();
    let grid = VoxelGrid::voxelize(&points, &indices, 30).unwrap();
    let voxel_volume = grid.pitch().powi(3);
    let volume = grid.num_occupied() as f64 * voxel_volume;
    let exact = 4.0 / 3.0 * std::f64::consts::PI * 8.0;

    // Surface voxels make the voxelized volume slightly larger.
    assert!(volume > 0.9 * exact && volume < 1.4 * exact);

    // The grid border is padded with empty voxels.
    let dims = grid.dims();
    for j in 0..dims.y {
        for k in 0..dims.z {
            assert!(!grid.is_occupied(0, j, k));
            assert!(!grid.is_occupied(1, j, k));
            assert!(!grid.is_occupied(dims.x - 1, j, k));
        }
    }
}
