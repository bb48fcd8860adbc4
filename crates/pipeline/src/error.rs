//! Pipeline Error Types

use thiserror::Error;

/// Errors raised while configuring or preparing a batch run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration file could not be read or parsed
    #[error("configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    /// A typed option failed validation
    #[error(transparent)]
    InvalidOption(#[from] eeg_core::ConfigError),

    /// The extractor set is empty
    #[error("no feature extractors selected")]
    NoExtractors,

    /// The worker pool could not be created
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
