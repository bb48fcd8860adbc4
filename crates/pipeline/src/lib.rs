//! Batch EEG Feature-Extraction Pipeline
//!
//! Sequences segmentation, quality gating, parallel FMM decomposition,
//! and classical feature extraction into per-epoch records plus a
//! machine-readable batch report.

pub mod batch;
pub mod config;
pub mod report;
pub mod synth;

mod error;

pub use batch::Pipeline;
pub use config::{ExtractorKind, PipelineConfig};
pub use error::PipelineError;
pub use report::{BatchReport, EpochRecord};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
