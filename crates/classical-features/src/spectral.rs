//! Spectral Band Features

use eeg_core::{PowerSpectrum, SpectrumAnalyzer};

/// Canonical EEG bands as `(name, low, high)` in Hz, `[low, high)`
pub const BANDS: [(&str, f64, f64); 5] = [
    ("delta", 1.0, 4.0),
    ("theta", 4.0, 8.0),
    ("alpha", 8.0, 13.0),
    ("beta", 13.0, 30.0),
    ("gamma", 30.0, 40.0),
];

/// Frequency range covered by the banded features (Hz)
pub const BAND_RANGE: (f64, f64) = (1.0, 40.0);

/// Spectral features of one channel
#[derive(Debug, Clone, Default)]
pub struct SpectralFeatures {
    /// Power per canonical band, in [`BANDS`] order
    pub band_powers: [f64; 5],
    /// Summed power across the banded range
    pub total_power: f64,
    /// Frequency of the strongest in-band bin (Hz)
    pub dominant_frequency: f64,
}

impl SpectralFeatures {
    /// Compute band features for one channel's samples
    pub fn compute(analyzer: &mut SpectrumAnalyzer, samples: &[f64]) -> Self {
        Self::from_spectrum(&analyzer.power_spectrum(samples))
    }

    /// Derive band features from a precomputed spectrum
    pub fn from_spectrum(spectrum: &PowerSpectrum) -> Self {
        let mut band_powers = [0.0; 5];
        for (slot, (_, low, high)) in band_powers.iter_mut().zip(BANDS) {
            *slot = spectrum.band_power(low, high);
        }
        let (range_low, range_high) = BAND_RANGE;
        Self {
            band_powers,
            total_power: spectrum.band_power(range_low, range_high),
            dominant_frequency: dominant_in_band(spectrum, range_low, range_high),
        }
    }
}

/// Frequency of the strongest bin inside `[low_hz, high_hz)`
fn dominant_in_band(spectrum: &PowerSpectrum, low_hz: f64, high_hz: f64) -> f64 {
    let mut best_power = 0.0;
    let mut best_freq = 0.0;
    for (i, &p) in spectrum.power.iter().enumerate() {
        let freq = spectrum.frequency_of(i);
        if freq < low_hz || freq >= high_hz {
            continue;
        }
        if p > best_power {
            best_power = p;
            best_freq = freq;
        }
    }
    best_freq
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
    fn test_alpha_tone_concentrates_in_alpha_band() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let features = SpectralFeatures::compute(&mut analyzer, &sine(10.0, 128.0, 2048));
        let alpha = features.band_powers[2];
        for (i, power) in features.band_powers.iter().enumerate() {
            if i != 2 {
                assert!(alpha > 10.0 * power);
            }
        }
        assert!((features.dominant_frequency - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_bands_tile_the_range() {
        // the five bands partition [1, 40), so their powers sum to the total
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let signal: Vec<f64> = sine(3.0, 128.0, 2048)
            .iter()
            .zip(sine(22.0, 128.0, 2048))
            .map(|(a, b)| a + 0.5 * b)
            .collect();
        let features = SpectralFeatures::compute(&mut analyzer, &signal);
        let summed: f64 = features.band_powers.iter().sum();
        assert!((summed - features.total_power).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_band_tone_is_nearly_invisible() {
        let mut analyzer = SpectrumAnalyzer::new(256.0);
        // 60 Hz mains tone sits above the gamma cutoff; only window
        // leakage reaches the banded range
        let out_band = SpectralFeatures::compute(&mut analyzer, &sine(60.0, 256.0, 2048));
        let in_band = SpectralFeatures::compute(&mut analyzer, &sine(10.0, 256.0, 2048));
        assert!(out_band.total_power < 0.01 * in_band.total_power);
    }

    #[test]
    fn test_empty_signal() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let features = SpectralFeatures::compute(&mut analyzer, &[]);
        assert_eq!(features.total_power, 0.0);
        assert_eq!(features.dominant_frequency, 0.0);
    }
}
