//! Classical EEG Features
//!
//! Closed-form time-domain and spectral features: moment statistics,
//! Hjorth parameters, zero crossings, canonical band powers. Implements
//! the same extractor capability as the FMM decomposition, so the two
//! variants are interchangeable downstream.

mod extractor;
mod spectral;
mod stats;

pub use extractor::{ClassicalConfig, ClassicalFeatureExtractor, FEATURES_PER_CHANNEL};
pub use spectral::{SpectralFeatures, BANDS, BAND_RANGE};
pub use stats::TimeDomainFeatures;
