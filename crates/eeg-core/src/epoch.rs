//! Epoch & Recording Data Model

use crate::error::EpochError;
use chrono::{DateTime, Utc};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one epoch within a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EpochId(pub u64);

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A continuous multichannel recording prior to segmentation
///
/// Rows of `data` are channels, columns are samples.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Channel x sample matrix
    pub data: Array2<f64>,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Ordered channel labels (10-20 system names for scalp EEG)
    pub channel_labels: Vec<String>,
    /// Wall-clock time of the first sample, when known
    pub start_time: Option<DateTime<Utc>>,
}

impl Recording {
    /// Create a recording from a channel x sample matrix
    pub fn new(
        data: Array2<f64>,
        sampling_rate: f64,
        channel_labels: Vec<String>,
    ) -> Self {
        Self {
            data,
            sampling_rate,
            channel_labels,
            start_time: None,
        }
    }

    /// Attach the wall-clock start time of the recording
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }
}

/// One fixed-duration multichannel signal segment
///
/// Construction performs no validation; consumers call [`Epoch::validate`]
/// so a malformed epoch fails at extraction time and leaves sibling epochs
/// in the same batch untouched. The matrix is never modified after
/// construction.
#[derive(Debug, Clone)]
pub struct Epoch {
    /// Identifier within the parent recording
    pub id: EpochId,
    /// Channel x sample matrix
    pub data: Array2<f64>,
    /// Sampling rate in Hz
    pub sampling_rate: f64,
    /// Ordered channel labels
    pub channel_labels: Vec<String>,
    /// Wall-clock time of the first sample, when known
    pub start_time: Option<DateTime<Utc>>,
}

impl Epoch {
    /// Create an epoch from a channel x sample matrix
    pub fn new(
        id: EpochId,
        data: Array2<f64>,
        sampling_rate: f64,
        channel_labels: Vec<String>,
    ) -> Self {
        Self {
            id,
            data,
            sampling_rate,
            channel_labels,
            start_time: None,
        }
    }

    /// Attach the wall-clock start time of this epoch
    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Number of channels (matrix rows)
    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples per channel (matrix columns)
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Epoch duration in seconds
    pub fn duration_s(&self) -> f64 {
        self.n_samples() as f64 / self.sampling_rate
    }

    /// View of one channel's samples
    pub fn channel(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.row(index)
    }

    /// Check structural consistency of this epoch
    pub fn validate(&self) -> Result<(), EpochError> {
        if self.n_channels() == 0 || self.n_samples() == 0 {
            return Err(EpochError::EmptyEpoch {
                channels: self.n_channels(),
                samples: self.n_samples(),
            });
        }
        if self.channel_labels.len() != self.n_channels() {
            return Err(EpochError::LabelMismatch {
                labels: self.channel_labels.len(),
                channels: self.n_channels(),
            });
        }
        Ok(())
    }
}
