use clump3d_f64::math::Point;
use clump3d_f64::query::{detect_contacts, BoundaryPolicy, ContactPolicy};
use clump3d_f64::shape::Clump;
use clump3d_f64::transformation::{
    exclude_points_inside, extract_surface, reconstruct_surface, trim_clump_samples, RadialHull,
    ReconstructionError,
};
use clump3d_f64::{ClumpConfig, ClumpError};

fn three_spheres() -> Clump {
    Clump::from_rows(&[
        [1.0, 0.0, 0.0, 1.1],
        [2.0, 1.0, 0.0, 1.1],
        [3.0, 0.0, 0.0, 1.2],
    ])
    .unwrap()
}

#[test]
fn three_sphere_contacts() {
    let pairs = detect_contacts(&three_spheres(), ContactPolicy::Strict);
    let pairs: Vec<_> = pairs.iter().map(|p| (p.0, p.1)).collect();
    assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
}

#[test]
fn three_sphere_surface_is_a_closed_sphere() {
    let clump = three_spheres();
    let mesh = extract_surface(&clump, &ClumpConfig::default()).unwrap();

    assert!(mesh.is_closed_manifold());
    assert_eq!(mesh.euler_characteristic(), 2);
    let v = mesh.vertices.len() as i64;
    let e = mesh.num_edges() as i64;
    let f = mesh.faces.len() as i64;
    assert_eq!(v - e + f, 2);

    // Every vertex lies on the boundary of the union of the spheres.
    for pt in &mesh.vertices {
        let on_some = clump.spheres().iter().any(|s| {
            (clump3d_f64::na::distance(pt, s.center()) - s.radius()).abs() < 1.0e-9
        });
        let inside_any = clump
            .spheres()
            .iter()
            .any(|s| clump3d_f64::na::distance(pt, s.center()) < s.radius() - 1.0e-9);
        assert!(on_some && !inside_any);
    }
}

#[test]
fn trimming_twice_changes_nothing() {
    let clump = three_spheres();
    let contacts = detect_contacts(&clump, ContactPolicy::Strict);

    for policy in [BoundaryPolicy::KeepBoundary, BoundaryPolicy::RemoveBoundary] {
        let mut samples = trim_clump_samples(&clump, &contacts, 150, 40, policy);
        let trimmed = samples.clone();

        for pair in &contacts {
            let (i, j) = (pair.0 as usize, pair.1 as usize);
            assert_eq!(
                exclude_points_inside(&mut samples[i], &clump.spheres()[j], policy),
                0
            );
            assert_eq!(
                exclude_points_inside(&mut samples[j], &clump.spheres()[i], policy),
                0
            );
        }

        assert_eq!(samples, trimmed);
    }
}

#[test]
fn degenerate_point_clouds_fail() {
    let collinear: Vec<_> = (0..10).map(|i| Point::new(i as f64, 0.0, 0.0)).collect();
    assert!(reconstruct_surface(&collinear, &RadialHull::new()).is_err());

    let duplicated = vec![Point::new(1.0, 2.0, 3.0); 10];
    assert_eq!(
        reconstruct_surface(&duplicated, &RadialHull::new()),
        Err(ReconstructionError::TooFewPoints(1))
    );

    let config = ClumpConfig {
        samples_per_sphere: 2,
        ..ClumpConfig::default()
    };
    assert!(matches!(
        extract_surface(&three_spheres(), &config),
        Err(ClumpError::InvalidParameter(_))
    ));
}

#[test]
fn single_sphere_surface() {
    let clump = Clump::from_rows(&[[0.5, 0.5, 0.5, 2.0]]).unwrap();
    let config = ClumpConfig {
        samples_per_sphere: 64,
        ..ClumpConfig::default()
    };
    let mesh = extract_surface(&clump, &config).unwrap();

    assert_eq!(mesh.vertices.len(), 64);
    assert_eq!(mesh.faces.len(), 2 * 64 - 4);
    assert!(mesh.is_closed_manifold());
}

#[test]
fn separate_spheres_are_not_bridged() {
    let clump = Clump::from_rows(&[[0.0, 0.0, 0.0, 1.0], [5.0, 0.0, 0.0, 1.0]]).unwrap();
    let mesh = extract_surface(&clump, &ClumpConfig::default()).unwrap();
    let right = |i: &u32| mesh.vertices[*i as usize].x > 2.5;

    assert!(mesh.vertices.iter().any(|pt| pt.x > 2.5));
    assert!(mesh.vertices.iter().any(|pt| pt.x < 2.5));

    for face in &mesh.faces {
        let side = right(&face[0]);
        assert!(face.iter().all(|i| right(i) == side));
    }
}
