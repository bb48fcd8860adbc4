//! EEG Epoch Quality Gate
//!
//! Rule-based quality metrics (NaN, gap, outlier, flatline, sharpness,
//! cohesion) and the assessor that combines them into an include/exclude
//! verdict per epoch. Downstream extractors trust the verdict and perform
//! no quality computation of their own.

mod assessor;
pub mod metrics;

pub use assessor::{QualityAssessor, QualityConfig, QualityReport};
