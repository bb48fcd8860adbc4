//! Individual Quality Metrics
//!
//! Each metric maps an epoch to a score in [0, 1], where 1.0 is clean.

use eeg_core::Epoch;

/// Fraction of samples that are finite
pub fn nan_quality(epoch: &Epoch) -> f64 {
    let total = epoch.data.len();
    if total == 0 {
        return 0.0;
    }
    let finite = epoch.data.iter().filter(|v| v.is_finite()).count();
    finite as f64 / total as f64
}

/// One minus the longest contiguous non-finite run, as a fraction of the
/// epoch length, taken over the worst channel
pub fn gap_quality(epoch: &Epoch) -> f64 {
    let n = epoch.n_samples();
    if n == 0 {
        return 0.0;
    }
    let mut worst_gap = 0usize;
    for row in epoch.data.rows() {
        let mut run = 0usize;
        let mut longest = 0usize;
        for &v in row {
            if v.is_finite() {
                run = 0;
            } else {
                run += 1;
                longest = longest.max(run);
            }
        }
        worst_gap = worst_gap.max(longest);
    }
    1.0 - worst_gap as f64 / n as f64
}

/// One minus the pooled fraction of samples with |z| above `z_threshold`
///
/// Z-scores are computed per channel over its finite samples; a constant
/// channel contributes no outliers.
pub fn outlier_quality(epoch: &Epoch, z_threshold: f64) -> f64 {
    let total = epoch.data.len();
    if total == 0 {
        return 0.0;
    }
    let mut outliers = 0usize;
    for row in epoch.data.rows() {
        let finite: Vec<f64> = row.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.len() < 2 {
            continue;
        }
        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let var = finite.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = var.sqrt();
        if std_dev == 0.0 {
            continue;
        }
        outliers += finite
            .iter()
            .filter(|&&v| ((v - mean) / std_dev).abs() > z_threshold)
            .count();
    }
    1.0 - outliers as f64 / total as f64
}

/// One minus the pooled fraction of samples sitting inside constant runs
/// of at least `min_duration_s`
pub fn flatline_quality(epoch: &Epoch, min_duration_s: f64) -> f64 {
    let total = epoch.data.len();
    if total == 0 {
        return 0.0;
    }
    let min_run = ((min_duration_s * epoch.sampling_rate).round() as usize).max(2);
    let mut flat_samples = 0usize;
    for row in epoch.data.rows() {
        let mut run = 1usize;
        for i in 1..row.len() {
            if row[i] == row[i - 1] && row[i].is_finite() {
                run += 1;
            } else {
                if run >= min_run {
                    flat_samples += run;
                }
                run = 1;
            }
        }
        if run >= min_run {
            flat_samples += run;
        }
    }
    1.0 - flat_samples as f64 / total as f64
}

/// One minus the pooled fraction of sample-to-sample steps larger than
/// `jump_sigma` standard deviations of the channel's first difference
pub fn sharpness_quality(epoch: &Epoch, jump_sigma: f64) -> f64 {
    let mut steps = 0usize;
    let mut jumps = 0usize;
    for row in epoch.data.rows() {
        let diffs: Vec<f64> = row
            .iter()
            .zip(row.iter().skip(1))
            .map(|(a, b)| b - a)
            .filter(|d| d.is_finite())
            .collect();
        if diffs.len() < 2 {
            continue;
        }
        let n = diffs.len() as f64;
        let mean = diffs.iter().sum::<f64>() / n;
        let std_dev =
            (diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n).sqrt();
        steps += diffs.len();
        if std_dev > 0.0 {
            jumps += diffs
                .iter()
                .filter(|&&d| ((d - mean) / std_dev).abs() > jump_sigma)
                .count();
        }
    }
    if steps == 0 {
        return 0.0;
    }
    1.0 - jumps as f64 / steps as f64
}

/// Mean absolute pairwise channel correlation
///
/// Scalp EEG channels share volume-conducted activity, so a healthy epoch
/// shows moderate inter-channel correlation. Returns 1.0 for a single
/// channel; degenerate pairs (constant or non-finite channels) count as
/// uncorrelated.
pub fn cohesion_quality(epoch: &Epoch) -> f64 {
    let n_channels = epoch.n_channels();
    if n_channels < 2 {
        return if epoch.data.is_empty() { 0.0 } else { 1.0 };
    }
    let channels: Vec<Vec<f64>> = (0..n_channels)
        .map(|c| epoch.channel(c).to_vec())
        .collect();
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for a in 0..n_channels {
        for b in (a + 1)..n_channels {
            sum += pearson(&channels[a], &channels[b]).abs();
            pairs += 1;
        }
    }
    sum / pairs as f64
}

/// Pearson correlation over pairwise-finite samples, 0.0 when degenerate
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let paired: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    if paired.len() < 2 {
        return 0.0;
    }
    let n = paired.len() as f64;
    let mean_a = paired.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_b = paired.iter().map(|(_, y)| y).sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in &paired {
        let da = x - mean_a;
        let db = y - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }
    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::EpochId;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn epoch_from(data: Array2<f64>) -> Epoch {
        let labels = (0..data.nrows()).map(|i| format!("Ch{i}")).collect();
        Epoch::new(EpochId(0), data, 128.0, labels)
    }

    fn noise_epoch(n_channels: usize, n_samples: usize) -> Epoch {
        let mut rng = StdRng::seed_from_u64(7);
        epoch_from(Array2::from_shape_fn((n_channels, n_samples), |_| {
            rng.gen_range(-1.0..1.0)
        }))
    }

    #[test]
    fn test_nan_quality_clean() {
        assert_eq!(nan_quality(&noise_epoch(4, 1000)), 1.0);
    }

    #[test]
    fn test_nan_quality_partial() {
        let mut epoch = noise_epoch(4, 1000);
        for i in 0..100 {
            epoch.data[[0, i]] = f64::NAN;
        }
        let q = nan_quality(&epoch);
        assert!((q - 0.975).abs() < 1e-9);
    }

    #[test]
    fn test_gap_quality_penalizes_runs() {
        let mut gapped = noise_epoch(1, 1000);
        for i in 200..400 {
            gapped.data[[0, i]] = f64::NAN;
        }
        let mut scattered = noise_epoch(1, 1000);
        for i in (0..1000).step_by(5) {
            scattered.data[[0, i]] = f64::NAN;
        }
        assert!(gap_quality(&gapped) < gap_quality(&scattered));
        assert!((gap_quality(&gapped) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_outlier_quality_detects_spikes() {
        let mut epoch = noise_epoch(1, 1000);
        for i in (0..1000).step_by(50) {
            epoch.data[[0, i]] = 100.0;
        }
        assert!(outlier_quality(&epoch, 3.0) < 1.0);
        assert!(outlier_quality(&noise_epoch(1, 1000), 10.0) == 1.0);
    }

    #[test]
    fn test_flatline_quality_detects_constant_run() {
        let mut epoch = noise_epoch(1, 1280);
        for i in 0..640 {
            epoch.data[[0, i]] = 1.5;
        }
        let q = flatline_quality(&epoch, 1.0);
        assert!((q - 0.5).abs() < 0.01);
        assert_eq!(flatline_quality(&noise_epoch(1, 1280), 1.0), 1.0);
    }

    #[test]
    fn test_sharpness_quality_detects_jumps() {
        let mut epoch = noise_epoch(1, 1000);
        epoch.data[[0, 500]] = 500.0;
        assert!(sharpness_quality(&epoch, 6.0) < 1.0);
    }

    #[test]
    fn test_cohesion_of_shared_signal() {
        let shared: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * 10.0 * i as f64 / 128.0).sin())
            .collect();
        let mut data = Array2::zeros((3, 1000));
        for c in 0..3 {
            for (i, &v) in shared.iter().enumerate() {
                data[[c, i]] = v * (1.0 + c as f64 * 0.1);
            }
        }
        assert!(cohesion_quality(&epoch_from(data)) > 0.99);
    }

    proptest::proptest! {
        #[test]
        fn prop_metrics_stay_in_unit_interval(seed in 0u64..50, n in 16usize..200) {
            let mut rng = StdRng::seed_from_u64(seed);
            let epoch = epoch_from(Array2::from_shape_fn((2, n), |_| {
                rng.gen_range(-50.0..50.0)
            }));
            for q in [
                nan_quality(&epoch),
                gap_quality(&epoch),
                outlier_quality(&epoch, 3.0),
                flatline_quality(&epoch, 0.1),
                sharpness_quality(&epoch, 6.0),
                cohesion_quality(&epoch),
            ] {
                proptest::prop_assert!((0.0..=1.0).contains(&q));
            }
        }
    }
}
