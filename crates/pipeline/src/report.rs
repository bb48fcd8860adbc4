//! Batch Run Reports

use chrono::{DateTime, Utc};
use eeg_core::{EpochId, FeatureVector};
use quality_gate::QualityReport;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one epoch within a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Epoch identifier within the recording
    pub epoch_id: EpochId,
    /// Wall-clock start of the epoch, when known
    pub start_time: Option<DateTime<Utc>>,
    /// Quality gate scores and verdict
    pub quality: QualityReport,
    /// Decomposition features; absent when the epoch failed the gate,
    /// the extractor was disabled, or the run was cancelled first
    pub fmm: Option<FeatureVector>,
    /// Classical features, under the same conditions
    pub classical: Option<FeatureVector>,
}

/// Machine-readable result of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Wall-clock time the run started
    pub started_at: DateTime<Utc>,
    /// Epochs sliced from the recording
    pub n_epochs: usize,
    /// Epochs that passed the quality gate
    pub n_passed: usize,
    /// Whether cancellation was observed during the run
    pub cancelled: bool,
    /// Per-epoch outcomes, ordered by epoch id
    pub records: Vec<EpochRecord>,
}

impl BatchReport {
    /// Epochs excluded by the quality gate
    pub fn n_rejected(&self) -> usize {
        self.n_epochs - self.n_passed
    }
}
