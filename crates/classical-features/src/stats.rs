//! Time-Domain Signal Statistics

/// Closed-form time-domain features of one channel
#[derive(Debug, Clone, Default)]
pub struct TimeDomainFeatures {
    /// Mean value
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
    /// Skewness (asymmetry)
    pub skewness: f64,
    /// Kurtosis (excess tailedness)
    pub kurtosis: f64,
    /// Mean-crossings per sample step
    pub zero_crossing_rate: f64,
    /// Hjorth mobility
    pub hjorth_mobility: f64,
    /// Hjorth complexity
    pub hjorth_complexity: f64,
}

impl TimeDomainFeatures {
    /// Compute features from a slice of samples
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let mut m2 = 0.0;
        let mut m3 = 0.0;
        let mut m4 = 0.0;
        for &v in values {
            let d = v - mean;
            m2 += d * d;
            m3 += d * d * d;
            m4 += d * d * d * d;
        }

        let variance = m2 / n;
        let std_dev = variance.sqrt();

        // Skewness: E[(X-mu)^3] / sigma^3
        let skewness = if std_dev > 0.0 {
            (m3 / n) / (std_dev * std_dev * std_dev)
        } else {
            0.0
        };

        // Kurtosis: E[(X-mu)^4] / sigma^4 - 3 (excess)
        let kurtosis = if std_dev > 0.0 {
            (m4 / n) / (variance * variance) - 3.0
        } else {
            0.0
        };

        // Crossings of the mean, counted per sample step
        let zero_crossing_rate = if values.len() >= 2 {
            let mut crossings = 0usize;
            for i in 1..values.len() {
                let prev = values[i - 1] - mean;
                let curr = values[i] - mean;
                if prev.signum() != curr.signum() && prev != 0.0 && curr != 0.0 {
                    crossings += 1;
                }
            }
            crossings as f64 / (values.len() - 1) as f64
        } else {
            0.0
        };

        let (hjorth_mobility, hjorth_complexity) = hjorth_parameters(values, variance);

        Self {
            mean,
            std_dev,
            skewness,
            kurtosis,
            zero_crossing_rate,
            hjorth_mobility,
            hjorth_complexity,
        }
    }
}

/// Hjorth mobility and complexity from first and second differences
///
/// Mobility is `sqrt(var(dx) / var(x))`; complexity is the mobility of
/// the first difference divided by the mobility of the signal. Both are
/// 0.0 when a variance in the chain vanishes.
fn hjorth_parameters(values: &[f64], activity: f64) -> (f64, f64) {
    if values.len() < 3 || activity <= 0.0 {
        return (0.0, 0.0);
    }
    let first: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let second: Vec<f64> = first.windows(2).map(|w| w[1] - w[0]).collect();

    let var_first = central_variance(&first);
    if var_first <= 0.0 {
        return (0.0, 0.0);
    }
    let mobility = (var_first / activity).sqrt();
    let mobility_first = (central_variance(&second) / var_first).sqrt();
    (mobility, mobility_first / mobility)
}

fn central_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn sine(freq: f64, sampling_rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (TAU * freq * i as f64 / sampling_rate).sin())
            .collect()
    }

    #[test]
    fn test_mean_and_std() {
        let stats = TimeDomainFeatures::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_signal_has_zero_skew() {
        let stats = TimeDomainFeatures::compute(&sine(4.0, 128.0, 1024));
        assert!(stats.skewness.abs() < 0.01);
    }

    #[test]
    fn test_constant_signal_degenerates_to_zeros() {
        let stats = TimeDomainFeatures::compute(&[3.3; 64]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
        assert_eq!(stats.hjorth_mobility, 0.0);
        assert_eq!(stats.hjorth_complexity, 0.0);
    }

    #[test]
    fn test_zero_crossing_rate_tracks_frequency() {
        // 10 Hz over one second crosses its mean about 20 times
        let stats = TimeDomainFeatures::compute(&sine(10.0, 128.0, 128));
        assert!((0.13..0.18).contains(&stats.zero_crossing_rate));
    }

    #[test]
    fn test_hjorth_of_pure_sine() {
        // mobility of a sine is its angular frequency per sample,
        // complexity is 1
        let stats = TimeDomainFeatures::compute(&sine(10.0, 128.0, 2048));
        let expected = TAU * 10.0 / 128.0;
        assert!((stats.hjorth_mobility - expected).abs() / expected < 0.02);
        assert!((stats.hjorth_complexity - 1.0).abs() < 0.05);
    }

    #[test]
    fn test_empty_input() {
        let stats = TimeDomainFeatures::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.zero_crossing_rate, 0.0);
    }
}
