//! Small numeric helpers shared by the classification passes.

/// Arithmetic mean; 0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (Bessel-corrected, n - 1 denominator).
///
/// Returns 0 for series shorter than two observations, where the sample
/// deviation is mathematically undefined; callers handle that degenerate
/// case with their own fallbacks.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_series_is_zero() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn sample_std_dev_matches_hand_computation() {
        // Series 2, 4, 4, 4, 5, 5, 7, 9 has sample variance 32/7.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let expected = (32.0f64 / 7.0).sqrt();
        assert!((sample_std_dev(&values) - expected).abs() < 1e-12);
    }

    #[test]
    fn sample_std_dev_of_single_observation_is_zero() {
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn sample_std_dev_of_constant_series_is_zero() {
        assert_eq!(sample_std_dev(&[3.0, 3.0, 3.0, 3.0]), 0.0);
    }
}
