//! Cross-Channel Feature Aggregation
//!
//! Flattens per-channel component sets into one fixed-length vector:
//! per-component parameters first, then per-order statistics across
//! channels, then a single total-variance scalar. Placeholder slots
//! contribute exact zeros, so the layout never shifts with convergence.

use crate::component::ComponentSet;
use crate::wave;
use eeg_core::{EpochId, FeatureVector};
use tracing::debug;

/// Values emitted per fitted component
pub const PARAMS_PER_COMPONENT: usize = 6;

/// Per-order statistics kept across channels
const STATS_PER_ORDER: usize = 6;

/// Builds the fixed-width FMM feature layout for one montage
#[derive(Debug, Clone)]
pub struct FeatureAggregator {
    channel_labels: Vec<String>,
    n_components: usize,
}

impl FeatureAggregator {
    pub fn new(channel_labels: Vec<String>, n_components: usize) -> Self {
        Self {
            channel_labels,
            n_components,
        }
    }

    /// Labels of the montage this layout was built for
    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }

    /// Component slots per channel
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Total vector length for this montage and component count
    pub fn feature_len(&self) -> usize {
        self.channel_labels.len() * self.n_components * PARAMS_PER_COMPONENT
            + self.n_components * STATS_PER_ORDER
            + 1
    }

    /// Position labels, in lockstep with `aggregate` output
    pub fn feature_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.feature_len());
        for label in &self.channel_labels {
            for order in 1..=self.n_components {
                for param in ["amp", "freq_hz", "alpha", "omega", "phase", "r2"] {
                    names.push(format!("{label}_fmm{order:02}_{param}"));
                }
            }
        }
        for order in 1..=self.n_components {
            for stat in [
                "amp_mean", "amp_std", "amp_max", "r2_mean", "r2_std", "r2_max",
            ] {
                names.push(format!("fmm{order:02}_{stat}"));
            }
        }
        names.push("fmm_total_variance_explained".to_string());
        names
    }

    /// Flatten one epoch's component sets, ordered by channel index
    pub fn aggregate(&self, epoch_id: EpochId, sets: &[ComponentSet]) -> FeatureVector {
        debug_assert_eq!(sets.len(), self.channel_labels.len());
        let mut values = Vec::with_capacity(self.feature_len());

        for set in sets {
            debug_assert_eq!(set.len(), self.n_components);
            for component in &set.components {
                values.push(component.amplitude);
                values.push(component.freq_hz);
                values.push(component.alpha);
                values.push(component.omega);
                values.push(component.phase);
                values.push(component.r_squared);
            }
        }

        for idx in 0..self.n_components {
            let amplitudes: Vec<f64> = sets.iter().map(|s| s.components[idx].amplitude).collect();
            let fits: Vec<f64> = sets.iter().map(|s| s.components[idx].r_squared).collect();
            values.push(wave::mean(&amplitudes));
            values.push(wave::variance(&amplitudes).sqrt());
            values.push(max_or_zero(&amplitudes));
            values.push(wave::mean(&fits));
            values.push(wave::variance(&fits).sqrt());
            values.push(max_or_zero(&fits));
        }

        let total: f64 = sets
            .iter()
            .map(ComponentSet::total_variance_explained)
            .sum();
        values.push(total);

        debug!(
            epoch_id = epoch_id.0,
            len = values.len(),
            "aggregated component sets"
        );
        FeatureVector::new(epoch_id, values)
    }
}

fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}
