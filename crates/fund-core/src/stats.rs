//! Sample statistics shared by the metrics calculator and the distribution builder.
//!
//! Both follow the same convention: a sample needs at least two observations
//! for a standard deviation, and anything shorter yields `0.0` instead of an error.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compute sample variance (divisor `n - 1`).
pub fn sample_variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64
}

/// Compute sample standard deviation.
pub fn sample_std_dev(data: &[f64]) -> f64 {
    sample_variance(data).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_sample_std_dev() {
        // Known sample: 2, 4, 4, 4, 5, 5, 7, 9 -> sample variance 32/7
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((sample_variance(&data) - 32.0 / 7.0).abs() < 1e-12);
        assert!((sample_std_dev(&data) - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_short_samples_have_zero_dispersion() {
        assert_eq!(sample_std_dev(&[]), 0.0);
        assert_eq!(sample_std_dev(&[0.42]), 0.0);
    }

    #[test]
    fn test_constant_sample() {
        assert_eq!(sample_std_dev(&[0.01, 0.01, 0.01]), 0.0);
    }
}
