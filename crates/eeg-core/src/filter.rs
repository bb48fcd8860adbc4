//! Signal Preprocessing Filters
//!
//! Butterworth band-pass and mains-notch filtering applied to a whole
//! recording before segmentation. Filtering is zero-phase: each biquad
//! runs forward and then backward over the channel, so oscillatory
//! timing survives for the downstream phase-sensitive decomposition.

use crate::epoch::Recording;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2, TAU};
use tracing::warn;

/// Filtering options applied ahead of epoch segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Band-pass corner frequencies in Hz; None keeps the full band
    pub band_pass: Option<(f64, f64)>,
    /// Mains interference notch center in Hz; None disables the notch
    pub notch_hz: Option<f64>,
    /// Quality factor of the notch
    pub notch_q: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            band_pass: Some((0.5, 45.0)),
            notch_hz: Some(50.0),
            notch_q: 30.0,
        }
    }
}

impl FilterConfig {
    /// Check the rate-independent option ranges
    ///
    /// Corner frequencies are additionally checked against the Nyquist
    /// limit when the filter is built for a concrete sampling rate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((low, high)) = self.band_pass {
            if !low.is_finite() || !high.is_finite() || low <= 0.0 || low >= high {
                return Err(ConfigError::MalformedBounds {
                    field: "band_pass",
                    min: low,
                    max: high,
                });
            }
        }
        if let Some(center) = self.notch_hz {
            if !center.is_finite() || center <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "notch_hz",
                    value: center,
                });
            }
        }
        if !self.notch_q.is_finite() || self.notch_q <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "notch_q",
                value: self.notch_q,
            });
        }
        Ok(())
    }
}

/// Normalized second-order filter section (a0 = 1)
#[derive(Debug, Clone, Copy)]
struct BiquadSection {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl BiquadSection {
    /// Second-order Butterworth low-pass
    fn low_pass(sampling_rate: f64, cutoff_hz: f64) -> Self {
        let k = (PI * cutoff_hz / sampling_rate).tan();
        let k2 = k * k;
        let norm = 1.0 / (1.0 + SQRT_2 * k + k2);
        Self {
            b0: k2 * norm,
            b1: 2.0 * k2 * norm,
            b2: k2 * norm,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - SQRT_2 * k + k2) * norm,
        }
    }

    /// Second-order Butterworth high-pass
    fn high_pass(sampling_rate: f64, cutoff_hz: f64) -> Self {
        let k = (PI * cutoff_hz / sampling_rate).tan();
        let k2 = k * k;
        let norm = 1.0 / (1.0 + SQRT_2 * k + k2);
        Self {
            b0: norm,
            b1: -2.0 * norm,
            b2: norm,
            a1: 2.0 * (k2 - 1.0) * norm,
            a2: (1.0 - SQRT_2 * k + k2) * norm,
        }
    }

    /// Notch centered on `center_hz` with bandwidth `center_hz / q`
    fn notch(sampling_rate: f64, center_hz: f64, q: f64) -> Self {
        let omega = TAU * center_hz / sampling_rate;
        let alpha = omega.sin() / (2.0 * q);
        let norm = 1.0 / (1.0 + alpha);
        let cos_term = -2.0 * omega.cos() * norm;
        Self {
            b0: norm,
            b1: cos_term,
            b2: norm,
            a1: cos_term,
            a2: (1.0 - alpha) * norm,
        }
    }

    /// One forward pass, direct form II transposed, zero initial state
    fn run(&self, samples: &mut [f64]) {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for v in samples.iter_mut() {
            let x = *v;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *v = y;
        }
    }
}

/// Zero-phase preprocessing filter for multichannel recordings
#[derive(Debug, Clone)]
pub struct SignalFilter {
    sections: Vec<BiquadSection>,
}

impl SignalFilter {
    /// Build the section cascade for one sampling rate
    pub fn new(config: &FilterConfig, sampling_rate: f64) -> Result<Self, ConfigError> {
        config.validate()?;
        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "sampling_rate",
                value: sampling_rate,
            });
        }
        let nyquist = sampling_rate / 2.0;

        let mut sections = Vec::new();
        if let Some((low, high)) = config.band_pass {
            if high >= nyquist {
                return Err(ConfigError::OutOfRange {
                    field: "band_pass",
                    value: high,
                    min: 0.0,
                    max: nyquist,
                });
            }
            sections.push(BiquadSection::high_pass(sampling_rate, low));
            sections.push(BiquadSection::low_pass(sampling_rate, high));
        }
        if let Some(center) = config.notch_hz {
            if center >= nyquist {
                return Err(ConfigError::OutOfRange {
                    field: "notch_hz",
                    value: center,
                    min: 0.0,
                    max: nyquist,
                });
            }
            sections.push(BiquadSection::notch(sampling_rate, center, config.notch_q));
        }
        Ok(Self { sections })
    }

    /// Filter one channel in place, forward and backward per section
    pub fn filter_channel(&self, samples: &mut [f64]) {
        for section in &self.sections {
            section.run(samples);
            samples.reverse();
            section.run(samples);
            samples.reverse();
        }
    }

    /// Filtered copy of a recording
    ///
    /// Channels containing non-finite samples pass through untouched:
    /// an IIR pass would smear the corruption across the whole channel
    /// and hide it from the quality gate.
    pub fn apply(&self, recording: &Recording) -> Recording {
        let mut filtered = recording.clone();
        for (index, mut row) in filtered.data.rows_mut().into_iter().enumerate() {
            if row.iter().any(|v| !v.is_finite()) {
                warn!(channel = index, "channel has non-finite samples, skipping filter");
                continue;
            }
            let mut samples = row.to_vec();
            self.filter_channel(&mut samples);
            for (slot, value) in row.iter_mut().zip(samples) {
                *slot = value;
            }
        }
        filtered
    }
}
