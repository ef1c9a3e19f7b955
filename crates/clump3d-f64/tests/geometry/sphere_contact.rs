use clump3d_f64::math::{Point, Real};
use clump3d_f64::query::{detect_contacts, sphere_contact, ContactPolicy, IntersectionCircle};
use clump3d_f64::shape::{Clump, Sphere};

fn random_sphere(rng: &mut oorandom::Rand64) -> Sphere {
    let mut coord = || rng.rand_float() as Real * 4.0 - 2.0;
    let center = Point::new(coord(), coord(), coord());
    Sphere::new(center, 0.1 + rng.rand_float() as Real * 2.0).unwrap()
}

#[test]
fn contact_is_symmetric() {
    let mut rng = oorandom::Rand64::new(1234);

    for _ in 0..1000 {
        let a = random_sphere(&mut rng);
        let b = random_sphere(&mut rng);

        for policy in [ContactPolicy::Strict, ContactPolicy::Touching] {
            assert_eq!(sphere_contact(&a, &b, policy), sphere_contact(&b, &a, policy));
        }

        // Strict contacts are also touching contacts.
        if sphere_contact(&a, &b, ContactPolicy::Strict) {
            assert!(sphere_contact(&a, &b, ContactPolicy::Touching));
        }
    }
}

#[test]
fn contact_pairs_match_the_definition() {
    let mut rng = oorandom::Rand64::new(42);
    let spheres: Vec<_> = (0..20).map(|_| random_sphere(&mut rng)).collect();
    let clump = Clump::new(spheres.clone());
    let pairs = detect_contacts(&clump, ContactPolicy::Strict);

    for i in 0..spheres.len() {
        for j in i + 1..spheres.len() {
            let d = clump3d_f64::na::distance(spheres[i].center(), spheres[j].center());
            let expected = (spheres[i].radius() - spheres[j].radius()).abs() < d
                && d < spheres[i].radius() + spheres[j].radius();
            let found = pairs.iter().any(|p| p.0 == i as u32 && p.1 == j as u32);
            assert_eq!(expected, found);
        }
    }
}

#[test]
fn two_unit_spheres() {
    let a = Sphere::new(Point::origin(), 1.0).unwrap();
    let b = Sphere::new(Point::new(1.5, 0.0, 0.0), 1.0).unwrap();

    assert!(sphere_contact(&a, &b, ContactPolicy::Strict));

    let circle = IntersectionCircle::new(&a, &b).unwrap();
    assert!(circle.radius > 0.0 && circle.radius <= 1.0);

    for pt in circle.sample(64) {
        approx::assert_relative_eq!(clump3d_f64::na::distance(&pt, a.center()), 1.0, epsilon = 1.0e-12);
        approx::assert_relative_eq!(clump3d_f64::na::distance(&pt, b.center()), 1.0, epsilon = 1.0e-12);
    }
}
