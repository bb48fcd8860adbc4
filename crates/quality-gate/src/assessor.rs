//! Quality Assessor & Verdict

use crate::metrics;
use eeg_core::{ConfigError, Epoch, EpochId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Thresholds for the quality verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Maximum tolerated non-finite sample fraction
    pub nan_threshold: f64,
    /// Maximum tolerated longest-gap fraction
    pub gap_threshold: f64,
    /// Maximum tolerated outlier fraction
    pub outlier_threshold: f64,
    /// Z-score above which a sample counts as an outlier
    pub outlier_z: f64,
    /// Minimum duration of a constant run to count as flatline (s)
    pub flatline_min_duration_s: f64,
    /// Step size in first-difference standard deviations counted as a jump
    pub sharpness_jump_sigma: f64,
    /// Minimum overall score for an epoch to pass
    pub quality_threshold: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            nan_threshold: 0.15,
            gap_threshold: 0.10,
            outlier_threshold: 0.05,
            outlier_z: 3.0,
            flatline_min_duration_s: 1.0,
            sharpness_jump_sigma: 6.0,
            quality_threshold: 0.7,
        }
    }
}

impl QualityConfig {
    /// Strict thresholds for clinical-grade recordings
    pub fn strict() -> Self {
        Self {
            nan_threshold: 0.05,
            gap_threshold: 0.02,
            outlier_threshold: 0.02,
            quality_threshold: 0.85,
            ..Self::default()
        }
    }

    /// Lenient thresholds for exploratory ambulatory data
    pub fn lenient() -> Self {
        Self {
            nan_threshold: 0.30,
            gap_threshold: 0.20,
            outlier_threshold: 0.10,
            quality_threshold: 0.5,
            ..Self::default()
        }
    }

    /// Check all thresholds are in their legal ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("nan_threshold", self.nan_threshold),
            ("gap_threshold", self.gap_threshold),
            ("outlier_threshold", self.outlier_threshold),
            ("quality_threshold", self.quality_threshold),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }
        for (field, value) in [
            ("outlier_z", self.outlier_z),
            ("flatline_min_duration_s", self.flatline_min_duration_s),
            ("sharpness_jump_sigma", self.sharpness_jump_sigma),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

/// Metric scores and verdict for one epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Epoch the report describes
    pub epoch_id: EpochId,
    /// Fraction of finite samples
    pub nan_quality: f64,
    /// Longest-gap score
    pub gap_quality: f64,
    /// Outlier score
    pub outlier_quality: f64,
    /// Flatline score
    pub flatline_quality: f64,
    /// Step-jump score
    pub sharpness_quality: f64,
    /// Inter-channel correlation score
    pub cohesion_quality: f64,
    /// Mean of the six metric scores
    pub overall_quality: f64,
    /// Include/exclude verdict
    pub passes: bool,
}

/// Computes quality metrics and the include/exclude verdict
///
/// An epoch passes when its overall score reaches `quality_threshold` and
/// none of the hard NaN/gap/outlier fractions exceed their limits.
pub struct QualityAssessor {
    config: QualityConfig,
}

impl QualityAssessor {
    /// Create an assessor with a validated config
    pub fn new(config: QualityConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Assess one epoch
    pub fn assess(&self, epoch: &Epoch) -> QualityReport {
        let nan_quality = metrics::nan_quality(epoch);
        let gap_quality = metrics::gap_quality(epoch);
        let outlier_quality = metrics::outlier_quality(epoch, self.config.outlier_z);
        let flatline_quality =
            metrics::flatline_quality(epoch, self.config.flatline_min_duration_s);
        let sharpness_quality =
            metrics::sharpness_quality(epoch, self.config.sharpness_jump_sigma);
        let cohesion_quality = metrics::cohesion_quality(epoch);

        let overall_quality = (nan_quality
            + gap_quality
            + outlier_quality
            + flatline_quality
            + sharpness_quality
            + cohesion_quality)
            / 6.0;

        let passes = overall_quality >= self.config.quality_threshold
            && (1.0 - nan_quality) <= self.config.nan_threshold
            && (1.0 - gap_quality) <= self.config.gap_threshold
            && (1.0 - outlier_quality) <= self.config.outlier_threshold;

        debug!(
            epoch = %epoch.id,
            overall = overall_quality,
            passes, "assessed epoch quality"
        );

        QualityReport {
            epoch_id: epoch.id,
            nan_quality,
            gap_quality,
            outlier_quality,
            flatline_quality,
            sharpness_quality,
            cohesion_quality,
            overall_quality,
            passes,
        }
    }
}

impl Default for QualityAssessor {
    fn default() -> Self {
        Self {
            config: QualityConfig::default(),
        }
    }
}
