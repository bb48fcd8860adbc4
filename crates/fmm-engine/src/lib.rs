//! Frequency-Modulated Mobius Decomposition Engine
//!
//! Greedy residual fitting of parametric oscillatory components. Each
//! component is a Mobius-warped cosine; per channel the engine repeats
//! coarse search, bounded refinement, exact linear solve, and
//! subtraction until the component budget is spent or a step stops
//! explaining variance.

mod aggregate;
mod coarse;
mod component;
mod config;
mod engine;
mod extractor;
mod fitter;
mod wave;

pub use aggregate::{FeatureAggregator, PARAMS_PER_COMPONENT};
pub use component::{Component, ComponentSet};
pub use config::{Bounds, FmmConfig, ModulationBounds};
pub use engine::{FitProgress, FmmEngine};
pub use extractor::FmmFeatureExtractor;
pub use fitter::{ComponentFitter, FitOutcome};
pub use wave::{component_waveform, warp_phase, WaveParams};
