//! Core EEG Data Model & Shared Signal Utilities
//!
//! Provides the epoch data model, epoch segmentation, preprocessing
//! filters, power-spectrum analysis, the feature-extractor capability
//! trait, and the shared error and cancellation types used across the
//! workspace.

mod cancel;
mod epoch;
mod error;
mod features;
mod filter;
mod slicer;
mod spectrum;

pub use cancel::CancellationToken;
pub use epoch::{Epoch, EpochId, Recording};
pub use error::{ConfigError, EpochError};
pub use filter::{FilterConfig, SignalFilter};
pub use features::{FeatureExtractor, FeatureVector};
pub use slicer::EpochSlicer;
pub use spectrum::{PowerSpectrum, SpectrumAnalyzer};
