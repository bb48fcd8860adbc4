//! Synthetic EEG Generation
//!
//! Band-mixture signals for the demonstration workflow and tests.

use eeg_core::Recording;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

/// Canonical `(frequency_hz, amplitude_uv)` mixture: one tone per EEG band
pub const SYNTH_BANDS: [(f64, f64); 5] = [
    (2.0, 25.0),
    (6.0, 20.0),
    (10.0, 35.0),
    (18.0, 15.0),
    (35.0, 8.0),
];

/// Peak amplitude of the additive noise (uV)
const NOISE_AMPLITUDE: f64 = 8.0;

/// Generate a multichannel band-mixture recording
///
/// Channels share the same tone frequencies with per-channel random
/// phases, so they stay correlated without being identical. Fully
/// deterministic for a given seed.
pub fn synthetic_recording(
    channel_labels: &[&str],
    duration_s: f64,
    sampling_rate: f64,
    seed: u64,
) -> Recording {
    let n = (duration_s * sampling_rate).round() as usize;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Array2::zeros((channel_labels.len(), n));

    for c in 0..channel_labels.len() {
        let phases: Vec<f64> = (0..SYNTH_BANDS.len())
            .map(|_| rng.gen_range(0.0..TAU))
            .collect();
        for i in 0..n {
            let t = i as f64 / sampling_rate;
            let mut v = 0.0;
            for ((freq, amp), phase) in SYNTH_BANDS.into_iter().zip(&phases) {
                v += amp * (TAU * freq * t + phase).sin();
            }
            v += rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
            data[[c, i]] = v;
        }
    }

    Recording::new(
        data,
        sampling_rate,
        channel_labels.iter().map(|s| s.to_string()).collect(),
    )
}
