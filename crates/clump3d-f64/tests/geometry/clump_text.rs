use clump3d_f64::io;
use clump3d_f64::math::Real;
use clump3d_f64::shape::Clump;

fn random_clump(seed: u64, n: usize) -> Clump {
    let mut rng = oorandom::Rand64::new(seed.into());
    let rows: Vec<_> = (0..n)
        .map(|_| {
            let mut coord = || (rng.rand_float() as Real - 0.5) * 1.0e3;
            [coord(), coord(), coord(), rng.rand_float() as Real + 1.0e-6]
        })
        .collect();
    Clump::from_rows(&rows).unwrap()
}

#[test]
fn text_round_trip() {
    for seed in 0..10 {
        let clump = random_clump(seed, 25);
        let parsed = io::parse_clump_text(&io::to_clump_text(&clump)).unwrap();

        assert_eq!(parsed.num_spheres(), clump.num_spheres());
        for (a, b) in clump.spheres().iter().zip(parsed.spheres()) {
            for (x, y) in a.to_row().iter().zip(b.to_row().iter()) {
                assert!((x - y).abs() <= 1.0e-9);
            }
        }
    }
}

#[test]
fn file_round_trip() {
    let clump = random_clump(7, 12);
    let path = std::env::temp_dir().join(format!("clump3d-{}.csv", std::process::id()));

    io::save_clump(&clump, &path).unwrap();
    let loaded = io::load_clump(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.unwrap(), clump);
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("clump3d-this-file-does-not-exist.csv");
    assert!(matches!(
        io::load_clump(path),
        Err(clump3d_f64::ClumpError::Io(_))
    ));
}
