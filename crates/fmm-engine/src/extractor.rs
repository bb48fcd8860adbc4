//! FMM Feature Extractor
//!
//! Binds the decomposition engine and the aggregator behind the shared
//! extractor capability so the pipeline can swap variants freely.

use crate::aggregate::FeatureAggregator;
use crate::component::ComponentSet;
use crate::config::FmmConfig;
use crate::engine::FmmEngine;
use eeg_core::{ConfigError, Epoch, EpochError, FeatureExtractor, FeatureVector};
use tracing::warn;

/// Extracts FMM decomposition features from multichannel epochs
///
/// The montage is fixed at construction; epochs with a different channel
/// count are rejected rather than silently reshaped.
pub struct FmmFeatureExtractor {
    engine: FmmEngine,
    aggregator: FeatureAggregator,
}

impl FmmFeatureExtractor {
    /// Build an extractor for one montage, validating the configuration
    pub fn new(config: FmmConfig, channel_labels: Vec<String>) -> Result<Self, ConfigError> {
        let n_components = config.n_components;
        let engine = FmmEngine::new(config)?;
        Ok(Self {
            engine,
            aggregator: FeatureAggregator::new(channel_labels, n_components),
        })
    }

    /// The decomposition engine, for callers that fan channels out
    /// across workers themselves
    pub fn engine(&self) -> &FmmEngine {
        &self.engine
    }

    /// The feature layout shared by every vector this extractor emits
    pub fn aggregator(&self) -> &FeatureAggregator {
        &self.aggregator
    }

    fn check_montage(&self, epoch: &Epoch) -> Result<(), EpochError> {
        epoch.validate()?;
        let expected = self.aggregator.channel_labels().len();
        if epoch.n_channels() != expected {
            return Err(EpochError::ChannelCountMismatch {
                expected,
                actual: epoch.n_channels(),
            });
        }
        let configured = self.engine.config().sampling_rate;
        if (epoch.sampling_rate - configured).abs() > f64::EPSILON {
            warn!(
                epoch_rate = epoch.sampling_rate,
                configured_rate = configured,
                "epoch sampling rate differs from configuration, using configured rate"
            );
        }
        Ok(())
    }
}

impl FeatureExtractor for FmmFeatureExtractor {
    fn name(&self) -> &'static str {
        "fmm"
    }

    fn feature_names(&self) -> Vec<String> {
        self.aggregator.feature_names()
    }

    fn extract(&self, epoch: &Epoch) -> Result<FeatureVector, EpochError> {
        self.check_montage(epoch)?;
        let sets: Vec<ComponentSet> = (0..epoch.n_channels())
            .map(|c| {
                let channel = epoch.channel(c).to_vec();
                self.engine.decompose(&channel, c)
            })
            .collect();
        Ok(self.aggregator.aggregate(epoch.id, &sets))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::EpochId;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::TAU;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ch{i}")).collect()
    }

    // cheap settings so the greedy loop pads early instead of grinding
    // through all ten slots on noise
    fn quick_config() -> FmmConfig {
        FmmConfig {
            max_iterations: 5,
            min_variance_explained: 0.9,
            random_seed: Some(1),
            ..FmmConfig::default()
        }
    }

    fn noise_epoch(id: u64, channels: usize, samples: usize) -> Epoch {
        let mut rng = StdRng::seed_from_u64(id);
        let data =
            Array2::from_shape_fn((channels, samples), |_| rng.gen_range(-10.0..10.0));
        Epoch::new(EpochId(id), data, 128.0, labels(channels))
    }

    #[test]
    fn test_vector_length_is_configuration_determined() {
        let extractor = FmmFeatureExtractor::new(quick_config(), labels(3)).unwrap();
        let epoch = noise_epoch(0, 3, 38_400);
        let vector = extractor.extract(&epoch).unwrap();
        // 3 channels x 10 components x 6 params + 10 x 6 stats + 1
        assert_eq!(vector.len(), 241);
        assert_eq!(extractor.feature_names().len(), 241);
    }

    #[test]
    fn test_channel_count_mismatch_rejected() {
        let extractor = FmmFeatureExtractor::new(quick_config(), labels(3)).unwrap();
        let bad = noise_epoch(1, 2, 256);
        match extractor.extract(&bad) {
            Err(EpochError::ChannelCountMismatch { expected, actual }) => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("expected channel mismatch, got {other:?}"),
        }

        // the extractor stays usable for well-formed epochs
        let good = noise_epoch(2, 3, 256);
        assert!(extractor.extract(&good).is_ok());
    }

    #[test]
    fn test_label_mismatch_rejected_without_poisoning_batch() {
        let extractor = FmmFeatureExtractor::new(quick_config(), labels(3)).unwrap();
        let mut malformed = noise_epoch(7, 3, 256);
        malformed.channel_labels.truncate(2);
        assert!(matches!(
            extractor.extract(&malformed),
            Err(EpochError::LabelMismatch {
                labels: 2,
                channels: 3
            })
        ));
        assert!(extractor.extract(&noise_epoch(8, 3, 256)).is_ok());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let config = FmmConfig {
            n_components: 2,
            random_seed: Some(9),
            ..FmmConfig::default()
        };
        let extractor = FmmFeatureExtractor::new(config, labels(2)).unwrap();
        let data = Array2::from_shape_fn((2, 640), |(c, i)| {
            let t = i as f64 / 128.0;
            (TAU * (8.0 + c as f64) * t).sin() * 3.0
        });
        let epoch = Epoch::new(EpochId(4), data, 128.0, labels(2));
        let a = extractor.extract(&epoch).unwrap();
        let b = extractor.extract(&epoch).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tone_lands_in_named_slot() {
        let config = FmmConfig {
            n_components: 1,
            random_seed: Some(3),
            ..FmmConfig::default()
        };
        let extractor = FmmFeatureExtractor::new(config, labels(1)).unwrap();
        let data = Array2::from_shape_fn((1, 2560), |(_, i)| {
            (TAU * 10.0 * i as f64 / 128.0).sin() * 4.0
        });
        let epoch = Epoch::new(EpochId(5), data, 128.0, labels(1));
        let vector = extractor.extract(&epoch).unwrap();
        let names = extractor.feature_names();

        let freq_idx = names.iter().position(|n| n == "ch0_fmm01_freq_hz").unwrap();
        let r2_idx = names.iter().position(|n| n == "ch0_fmm01_r2").unwrap();
        assert!((vector.values[freq_idx] - 10.0).abs() < 0.5);
        assert!(vector.values[r2_idx] > 0.95);
    }
}
