//! Classical Feature Extractor

use crate::spectral::SpectralFeatures;
use crate::stats::TimeDomainFeatures;
use eeg_core::{
    ConfigError, Epoch, EpochError, FeatureExtractor, FeatureVector, SpectrumAnalyzer,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Features emitted per channel
pub const FEATURES_PER_CHANNEL: usize = 14;

/// Options of the classical extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassicalConfig {
    /// Sampling rate of incoming epochs (Hz)
    pub sampling_rate: f64,
}

impl Default for ClassicalConfig {
    fn default() -> Self {
        Self {
            sampling_rate: 128.0,
        }
    }
}

impl ClassicalConfig {
    /// Check option values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sampling_rate <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "sampling_rate",
                value: self.sampling_rate,
            });
        }
        Ok(())
    }
}

/// Extracts closed-form statistical and spectral features per channel
pub struct ClassicalFeatureExtractor {
    config: ClassicalConfig,
    channel_labels: Vec<String>,
}

impl ClassicalFeatureExtractor {
    /// Build an extractor for one montage, validating the configuration
    pub fn new(
        config: ClassicalConfig,
        channel_labels: Vec<String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            channel_labels,
        })
    }

    /// Labels of the montage this extractor was built for
    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }
}

impl FeatureExtractor for ClassicalFeatureExtractor {
    fn name(&self) -> &'static str {
        "classical"
    }

    fn feature_names(&self) -> Vec<String> {
        let per_channel = [
            "mean",
            "std",
            "skewness",
            "kurtosis",
            "zcr",
            "hjorth_mobility",
            "hjorth_complexity",
            "delta_power",
            "theta_power",
            "alpha_power",
            "beta_power",
            "gamma_power",
            "total_power",
            "dominant_freq",
        ];
        let mut names = Vec::with_capacity(self.channel_labels.len() * per_channel.len());
        for label in &self.channel_labels {
            for feature in per_channel {
                names.push(format!("{label}_{feature}"));
            }
        }
        names
    }

    fn extract(&self, epoch: &Epoch) -> Result<FeatureVector, EpochError> {
        epoch.validate()?;
        let expected = self.channel_labels.len();
        if epoch.n_channels() != expected {
            return Err(EpochError::ChannelCountMismatch {
                expected,
                actual: epoch.n_channels(),
            });
        }

        let mut analyzer = SpectrumAnalyzer::new(self.config.sampling_rate);
        let mut values = Vec::with_capacity(expected * FEATURES_PER_CHANNEL);
        for c in 0..epoch.n_channels() {
            let samples = epoch.channel(c).to_vec();
            let time = TimeDomainFeatures::compute(&samples);
            let spectral = SpectralFeatures::compute(&mut analyzer, &samples);

            values.push(time.mean);
            values.push(time.std_dev);
            values.push(time.skewness);
            values.push(time.kurtosis);
            values.push(time.zero_crossing_rate);
            values.push(time.hjorth_mobility);
            values.push(time.hjorth_complexity);
            values.extend_from_slice(&spectral.band_powers);
            values.push(spectral.total_power);
            values.push(spectral.dominant_frequency);
        }

        debug!(
            epoch_id = epoch.id.0,
            len = values.len(),
            "extracted classical features"
        );
        Ok(FeatureVector::new(epoch.id, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::EpochId;
    use ndarray::Array2;
    use std::f64::consts::TAU;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn tone_epoch(freqs: &[f64], amps: &[f64], n: usize) -> Epoch {
        let data = Array2::from_shape_fn((freqs.len(), n), |(c, i)| {
            amps[c] * (TAU * freqs[c] * i as f64 / 128.0).sin()
        });
        let label_names: Vec<String> = (0..freqs.len()).map(|i| format!("ch{i}")).collect();
        Epoch::new(EpochId(0), data, 128.0, label_names)
    }

    #[test]
    fn test_names_match_vector() {
        let extractor = ClassicalFeatureExtractor::new(
            ClassicalConfig::default(),
            labels(&["Fp1", "Fp2"]),
        )
        .unwrap();
        let names = extractor.feature_names();
        assert_eq!(names.len(), 2 * FEATURES_PER_CHANNEL);
        assert_eq!(names[0], "Fp1_mean");
        assert_eq!(names[13], "Fp1_dominant_freq");
        assert_eq!(names[14], "Fp2_mean");

        let epoch = tone_epoch(&[10.0, 6.0], &[1.0, 1.0], 1024);
        let vector = extractor.extract(&epoch).unwrap();
        assert_eq!(vector.len(), names.len());
    }

    #[test]
    fn test_alpha_tone_feature_values() {
        let extractor =
            ClassicalFeatureExtractor::new(ClassicalConfig::default(), labels(&["O1"]))
                .unwrap();
        let epoch = tone_epoch(&[10.0], &[2.0], 2048);
        let vector = extractor.extract(&epoch).unwrap();
        let names = extractor.feature_names();

        let get = |name: &str| {
            let idx = names.iter().position(|n| n == &format!("O1_{name}")).unwrap();
            vector.values[idx]
        };
        assert!(get("mean").abs() < 1e-9);
        assert!((get("std") - 2.0 / 2.0_f64.sqrt()).abs() < 1e-6);
        assert!((get("dominant_freq") - 10.0).abs() < 0.5);
        assert!(get("alpha_power") > 10.0 * get("beta_power"));
    }

    #[test]
    fn test_channel_count_mismatch_rejected() {
        let extractor = ClassicalFeatureExtractor::new(
            ClassicalConfig::default(),
            labels(&["Fp1", "Fp2", "F3"]),
        )
        .unwrap();
        let epoch = tone_epoch(&[10.0], &[1.0], 256);
        assert!(matches!(
            extractor.extract(&epoch),
            Err(EpochError::ChannelCountMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassicalConfig { sampling_rate: 0.0 };
        assert!(ClassicalFeatureExtractor::new(config, labels(&["Fp1"])).is_err());
    }
}
