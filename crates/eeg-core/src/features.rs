//! Feature Vector & Extractor Capability

use crate::epoch::{Epoch, EpochId};
use crate::error::EpochError;
use serde::{Deserialize, Serialize};

/// Fixed-length numeric feature vector for one epoch
///
/// The length is a pure function of the producing extractor's
/// configuration, never of per-epoch convergence outcomes, so any
/// fixed-width downstream consumer sees a stable schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Epoch the features were derived from
    pub epoch_id: EpochId,
    /// Feature values, ordered as described by the extractor's names
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Create a feature vector for an epoch
    pub fn new(epoch_id: EpochId, values: Vec<f64>) -> Self {
        Self { epoch_id, values }
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no features
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Capability shared by all feature-extractor variants
///
/// Implementations are pure given a fixed configuration: the same epoch
/// always yields the same vector, and no state is held across calls.
pub trait FeatureExtractor: Send + Sync {
    /// Short stable name of this extractor variant
    fn name(&self) -> &'static str;

    /// Ordered labels for each position of the produced vector
    ///
    /// Available without an epoch; the length equals the length of every
    /// vector this extractor returns.
    fn feature_names(&self) -> Vec<String>;

    /// Compute the feature vector for one epoch
    fn extract(&self, epoch: &Epoch) -> Result<FeatureVector, EpochError>;
}
