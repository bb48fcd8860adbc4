//! Pipeline Configuration

use crate::error::PipelineError;
use classical_features::ClassicalConfig;
use eeg_core::FilterConfig;
use fmm_engine::FmmConfig;
use quality_gate::QualityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feature-extractor variants the pipeline can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// Mobius decomposition features
    Fmm,
    /// Closed-form statistical and spectral features
    Classical,
}

/// Options of one batch run
///
/// Missing top-level keys in a file source fall back to these defaults,
/// so a configuration file only states what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Epoch length in seconds
    pub epoch_length_s: f64,
    /// Fractional overlap between consecutive epochs, in [0, 1)
    pub overlap: f64,
    /// Worker threads for the extraction pool; 0 keeps the rayon default
    pub worker_threads: usize,
    /// Extractors to run
    pub extractors: Vec<ExtractorKind>,
    /// Preprocessing filter applied to the recording before slicing;
    /// None disables filtering
    pub filter: Option<FilterConfig>,
    /// Quality gate thresholds
    pub quality: QualityConfig,
    /// Decomposition options
    pub fmm: FmmConfig,
    /// Classical extractor options
    pub classical: ClassicalConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            epoch_length_s: 300.0,
            overlap: 0.0,
            worker_threads: 0,
            extractors: vec![ExtractorKind::Fmm, ExtractorKind::Classical],
            filter: Some(FilterConfig::default()),
            quality: QualityConfig::default(),
            fmm: FmmConfig::default(),
            classical: ClassicalConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load options from a file source, then validate
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        let loaded: PipelineConfig = settings.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check option values
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.epoch_length_s <= 0.0 {
            return Err(eeg_core::ConfigError::NotPositive {
                field: "epoch_length_s",
                value: self.epoch_length_s,
            }
            .into());
        }
        if !(0.0..1.0).contains(&self.overlap) {
            return Err(eeg_core::ConfigError::OutOfRange {
                field: "overlap",
                value: self.overlap,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        if self.extractors.is_empty() {
            return Err(PipelineError::NoExtractors);
        }
        if let Some(filter) = &self.filter {
            filter.validate()?;
        }
        self.quality.validate()?;
        self.fmm.validate()?;
        self.classical.validate()?;
        Ok(())
    }
}
