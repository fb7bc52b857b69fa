use super::*;
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn deg_to_rad_matches_std() {
    assert_eq!(deg_to_rad(0), 0.0);
    assert!((deg_to_rad(180) - std::f64::consts::PI).abs() < 1e-12);
    assert!((deg_to_rad(-90) + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn sign_maps_zero_to_zero() {
    assert_eq!(sign(0.0), 0.0);
    assert_eq!(sign(-0.0), 0.0);
    assert_eq!(sign(3.5), 1.0);
    assert_eq!(sign(-0.1), -1.0);
}

#[test]
fn approx_eq_is_inclusive() {
    assert!(approx_eq(1.0, 1.0 + 1e-10, 1e-9));
    assert!(approx_eq(1.0, 1.5, 0.5));
    assert!(!approx_eq(1.0, 1.0 + 1e-8, 1e-9));
    assert!(approx_eq(2.0, 2.0, 0.0));
}

#[test]
fn rand_range_is_half_open_and_handles_empty() {
    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..500 {
        let v = rand_range(&mut rng, 5, 8);
        assert!((5..8).contains(&v));
    }
    assert_eq!(rand_range(&mut rng, 4, 4), 4);
    assert_eq!(rand_range(&mut rng, 10, 2), 10);
}
