//! Epoch Segmentation

use crate::epoch::{Epoch, EpochId, Recording};
use crate::error::ConfigError;
use chrono::Duration;
use ndarray::s;
use tracing::debug;

/// Slices a continuous recording into fixed-duration epochs
///
/// A trailing window shorter than the epoch length is dropped.
#[derive(Debug, Clone)]
pub struct EpochSlicer {
    /// Epoch duration in seconds
    epoch_length_s: f64,
    /// Fractional overlap between consecutive epochs, in [0, 1)
    overlap: f64,
}

impl EpochSlicer {
    /// Create a slicer, validating its parameters
    pub fn new(epoch_length_s: f64, overlap: f64) -> Result<Self, ConfigError> {
        if !epoch_length_s.is_finite() || epoch_length_s <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "epoch_length_s",
                value: epoch_length_s,
            });
        }
        if !overlap.is_finite() || !(0.0..1.0).contains(&overlap) {
            return Err(ConfigError::OutOfRange {
                field: "overlap",
                value: overlap,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(Self {
            epoch_length_s,
            overlap,
        })
    }

    /// Samples each epoch will contain at the given sampling rate
    pub fn samples_per_epoch(&self, sampling_rate: f64) -> usize {
        (self.epoch_length_s * sampling_rate).round() as usize
    }

    /// Segment a recording into epochs with sequential identifiers
    pub fn slice(&self, recording: &Recording) -> Vec<Epoch> {
        let n_samples = recording.data.ncols();
        let samples_per_epoch = self.samples_per_epoch(recording.sampling_rate);
        if samples_per_epoch == 0 || n_samples < samples_per_epoch {
            return Vec::new();
        }

        let hop = ((samples_per_epoch as f64) * (1.0 - self.overlap)).round() as usize;
        let hop = hop.max(1);

        let mut epochs = Vec::new();
        let mut start = 0;
        let mut next_id = 0u64;
        while start + samples_per_epoch <= n_samples {
            let window = recording
                .data
                .slice(s![.., start..start + samples_per_epoch])
                .to_owned();
            let mut epoch = Epoch::new(
                EpochId(next_id),
                window,
                recording.sampling_rate,
                recording.channel_labels.clone(),
            );
            if let Some(recording_start) = recording.start_time {
                let offset_ms =
                    (start as f64 / recording.sampling_rate * 1000.0).round() as i64;
                epoch = epoch.with_start_time(recording_start + Duration::milliseconds(offset_ms));
            }
            epochs.push(epoch);
            next_id += 1;
            start += hop;
        }

        debug!(
            epochs = epochs.len(),
            samples_per_epoch, "sliced recording into epochs"
        );
        epochs
    }
}
