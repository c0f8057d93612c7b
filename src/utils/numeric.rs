use rand::Rng;

/// Rounds half away from zero to `precision` decimal places.
pub fn to_fixed(num: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (num * scale).round() / scale
}

/// Nearest integer, halves away from zero.
pub fn round_half(x: f64) -> f64 {
    let truncated = x.trunc();
    if (x - truncated).abs() >= 0.5 {
        truncated + 1f64.copysign(x)
    } else {
        truncated
    }
}

/// Symmetric percent change between two values, 3 decimals.
pub fn get_diff(new_value: f64, old_value: f64) -> f64 {
    let mid = (new_value + old_value) / 2.0;
    if mid == 0.0 {
        return 0.0;
    }
    to_fixed((new_value - old_value) / mid * 100.0, 3)
}

/// Uniform value in `[min, max)`; an empty or inverted range yields `min`.
pub fn rand_float<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if !(min < max) {
        return min;
    }
    rng.gen_range(min..max)
}

/// `n` uniform values in `[min, max)` rounded to 3 decimals.
pub fn rand_floats<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|_| to_fixed(rand_float(rng, min, max), 3))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(1.23456, 3), 1.235);
        assert_eq!(to_fixed(-1.23456, 2), -1.23);
        assert_eq!(to_fixed(0.0005, 3), 0.001);
    }

    #[test]
    fn test_round_half() {
        assert_eq!(round_half(0.5), 1.0);
        assert_eq!(round_half(0.49), 0.0);
        assert_eq!(round_half(-0.5), -1.0);
        assert_eq!(round_half(0.731), 1.0);
    }

    #[test]
    fn test_get_diff() {
        // (110 - 90) / 100 * 100
        assert_eq!(get_diff(110.0, 90.0), 20.0);
        assert_eq!(get_diff(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_degenerate_ranges_are_clamped() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rand_float(&mut rng, 2.0, 2.0), 2.0);
        assert_eq!(rand_float(&mut rng, 3.0, -1.0), 3.0);
    }

    #[test]
    fn test_rand_floats_within_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let values = rand_floats(&mut rng, -10.0, 10.0, 200);
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|v| (-10.0..=10.0).contains(v)));
        assert!(values.iter().all(|v| to_fixed(*v, 3) == *v));
    }
}
