//! FFT Power-Spectrum Analysis

use rustfft::{num_complex::Complex, FftPlanner};

/// One-sided power spectrum of a real signal
#[derive(Debug, Clone, Default)]
pub struct PowerSpectrum {
    /// Frequency spacing between adjacent bins (Hz)
    pub resolution_hz: f64,
    /// Power per positive-frequency bin, DC first
    pub power: Vec<f64>,
}

impl PowerSpectrum {
    /// Center frequency of a bin
    pub fn frequency_of(&self, bin: usize) -> f64 {
        bin as f64 * self.resolution_hz
    }

    /// Summed power over `[low_hz, high_hz)`
    pub fn band_power(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.power
            .iter()
            .enumerate()
            .filter(|(i, _)| {
                let freq = self.frequency_of(*i);
                freq >= low_hz && freq < high_hz
            })
            .map(|(_, &p)| p)
            .sum()
    }

    /// Frequency of the strongest oscillatory bin, 0.0 for an empty
    /// spectrum
    ///
    /// The DC bin is excluded: a nonzero signal mean is an offset, not
    /// a dominant oscillation.
    pub fn dominant_frequency(&self) -> f64 {
        let mut max_power = 0.0;
        let mut max_bin = 0;
        for (i, &p) in self.power.iter().enumerate().skip(1) {
            if p > max_power {
                max_power = p;
                max_bin = i;
            }
        }
        self.frequency_of(max_bin)
    }

    /// Bins that are local maxima within `[low_hz, high_hz]`, strongest first
    ///
    /// Ties break toward the lower frequency so the ordering is
    /// reproducible across runs.
    pub fn peak_bins(&self, low_hz: f64, high_hz: f64, max_peaks: usize) -> Vec<usize> {
        let mut peaks: Vec<usize> = Vec::new();
        for i in 1..self.power.len().saturating_sub(1) {
            let freq = self.frequency_of(i);
            if freq < low_hz || freq > high_hz {
                continue;
            }
            if self.power[i] >= self.power[i - 1] && self.power[i] > self.power[i + 1] {
                peaks.push(i);
            }
        }
        peaks.sort_by(|&a, &b| {
            self.power[b]
                .partial_cmp(&self.power[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        peaks.truncate(max_peaks);
        peaks
    }
}

/// FFT analyzer producing one-sided power spectra
pub struct SpectrumAnalyzer {
    /// FFT planner, reused across calls for plan caching
    planner: FftPlanner<f64>,
    /// Sampling rate (Hz)
    sample_rate: f64,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for signals sampled at `sample_rate` Hz
    pub fn new(sample_rate: f64) -> Self {
        Self {
            planner: FftPlanner::new(),
            sample_rate,
        }
    }

    /// Apply Hamming window to reduce spectral leakage
    fn apply_hamming_window(signal: &mut [f64]) {
        let n = signal.len();
        if n < 2 {
            return;
        }
        for (i, v) in signal.iter_mut().enumerate() {
            let window =
                0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (n - 1) as f64).cos();
            *v *= window;
        }
    }

    /// Compute the one-sided power spectrum of a signal
    pub fn power_spectrum(&mut self, signal: &[f64]) -> PowerSpectrum {
        if signal.is_empty() {
            return PowerSpectrum::default();
        }

        let n = signal.len();

        let mut windowed: Vec<f64> = signal.to_vec();
        Self::apply_hamming_window(&mut windowed);

        let mut buffer: Vec<Complex<f64>> = windowed
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        // Magnitude squared over positive frequencies, normalized by n
        let power: Vec<f64> = buffer
            .iter()
            .take(n / 2)
            .map(|c| c.norm_sqr() / n as f64)
            .collect();

        PowerSpectrum {
            resolution_hz: self.sample_rate / n as f64,
            power,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, sample_rate: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_dominant_frequency_of_sine() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let spectrum = analyzer.power_spectrum(&sine(10.0, 128.0, 1024));
        assert!((spectrum.dominant_frequency() - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_dominant_frequency_ignores_offset() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let offset_tone: Vec<f64> =
            sine(10.0, 128.0, 1024).iter().map(|v| v + 50.0).collect();
        let spectrum = analyzer.power_spectrum(&offset_tone);
        assert!((spectrum.dominant_frequency() - 10.0).abs() < 0.5);
    }

    #[test]
    fn test_band_power_concentration() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let spectrum = analyzer.power_spectrum(&sine(10.0, 128.0, 2048));
        let alpha = spectrum.band_power(8.0, 13.0);
        let beta = spectrum.band_power(13.0, 30.0);
        assert!(alpha > 10.0 * beta);
    }

    #[test]
    fn test_peak_bins_sorted_by_power() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let n = 2048;
        let signal: Vec<f64> = sine(10.0, 128.0, n)
            .iter()
            .zip(sine(20.0, 128.0, n))
            .map(|(a, b)| 3.0 * a + b)
            .collect();
        let spectrum = analyzer.power_spectrum(&signal);
        let peaks = spectrum.peak_bins(1.0, 40.0, 2);
        assert_eq!(peaks.len(), 2);
        assert!((spectrum.frequency_of(peaks[0]) - 10.0).abs() < 0.5);
        assert!((spectrum.frequency_of(peaks[1]) - 20.0).abs() < 0.5);
    }

    #[test]
    fn test_empty_signal() {
        let mut analyzer = SpectrumAnalyzer::new(128.0);
        let spectrum = analyzer.power_spectrum(&[]);
        assert!(spectrum.power.is_empty());
        assert_eq!(spectrum.dominant_frequency(), 0.0);
    }
}
