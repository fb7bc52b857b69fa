use rand::Rng;

/// Convert a whole number of degrees to radians.
pub(crate) fn deg_to_rad(deg: i64) -> f64 {
    (deg as f64).to_radians()
}

/// Sign of `v` as `-1.0`, `0.0` or `1.0`.
///
/// Unlike [`f64::signum`], zero maps to zero.
pub(crate) fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `true` when `a` and `b` differ by at most `eps`.
pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Uniform integer in the half-open range `[lo, hi)`.
///
/// Returns `lo` when the range is empty.
pub(crate) fn rand_range(rng: &mut impl Rng, lo: i64, hi: i64) -> i64 {
    if hi <= lo {
        return lo;
    }
    rng.gen_range(lo..hi)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
