//! Shared Error Types

use thiserror::Error;

/// Errors raised when a configuration object is constructed
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Value outside its allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value that must be strictly positive
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// (min, max) pair with min >= max or ends outside the legal range
    #[error("{field} bounds ({min}, {max}) are malformed")]
    MalformedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

/// Structural errors for a single epoch; sibling epochs are unaffected
#[derive(Debug, Clone, Error)]
pub enum EpochError {
    /// Label sequence length disagrees with the matrix channel count
    #[error("epoch has {labels} channel labels but {channels} matrix channels")]
    LabelMismatch { labels: usize, channels: usize },

    /// Epoch channel count disagrees with the extractor's configured montage
    #[error("extractor configured for {expected} channels, epoch has {actual}")]
    ChannelCountMismatch { expected: usize, actual: usize },

    /// Epoch with no channels or no samples
    #[error("epoch is empty ({channels} channels, {samples} samples)")]
    EmptyEpoch { channels: usize, samples: usize },
}
