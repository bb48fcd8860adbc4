//! Greedy Decomposition Engine
//!
//! Drives the per-channel residual-fitting loop: coarse candidate search,
//! refinement, exact linear solve, subtraction. The loop is modeled as an
//! explicit state progression so early termination and placeholder
//! filling are ordinary transitions rather than hidden control flow.

use crate::coarse;
use crate::component::{Component, ComponentSet};
use crate::config::FmmConfig;
use crate::fitter::ComponentFitter;
use crate::wave::{self, BasisWorkspace};
use eeg_core::{CancellationToken, ConfigError, SpectrumAnalyzer};
use tracing::{debug, warn};

/// Residual variance at or below this is treated as numerically zero
const VARIANCE_FLOOR: f64 = 1e-12;
/// Coarse-search seed when the configuration leaves it unset
const DEFAULT_SEED: u64 = 42;

/// Per-channel progression of the greedy loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitProgress {
    /// About to fit the component at this order
    Fitting { order: usize },
    /// Component accepted with the refinement converged
    Converged { order: usize },
    /// Component accepted at the iteration cap
    Failed { order: usize },
    /// Slots from this order onward become placeholders
    Padding { from: usize },
    /// Set complete
    Done,
}

impl FitProgress {
    /// Transition following an accepted or padded step; other states are
    /// unchanged
    pub fn advance(self, n_components: usize) -> FitProgress {
        match self {
            FitProgress::Converged { order } | FitProgress::Failed { order } => {
                if order >= n_components {
                    FitProgress::Done
                } else {
                    FitProgress::Fitting { order: order + 1 }
                }
            }
            FitProgress::Padding { .. } => FitProgress::Done,
            other => other,
        }
    }
}

/// Greedy per-channel decomposition into Mobius-warped components
///
/// Stateless across calls: every decomposition owns its residual buffer,
/// candidate-search state, and fitter workspace, so channels can be
/// processed on independent workers with the engine shared read-only.
pub struct FmmEngine {
    config: FmmConfig,
    fitter: ComponentFitter,
}

impl FmmEngine {
    /// Create an engine, validating the configuration first
    pub fn new(config: FmmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let fitter = ComponentFitter::new(&config);
        Ok(Self { config, fitter })
    }

    /// The validated configuration
    pub fn config(&self) -> &FmmConfig {
        &self.config
    }

    /// Decompose one channel into exactly K components
    ///
    /// Never fails: numeric trouble degrades to placeholder slots.
    pub fn decompose(&self, signal: &[f64], channel: usize) -> ComponentSet {
        self.decompose_with_cancel(signal, channel, None)
    }

    /// Decompose one channel, checking the token before each new fit
    ///
    /// A cancellation observed mid-set pads the remaining slots; the fit
    /// already in flight runs to its natural stopping condition.
    pub fn decompose_with_cancel(
        &self,
        signal: &[f64],
        channel: usize,
        cancel: Option<&CancellationToken>,
    ) -> ComponentSet {
        let k = self.config.n_components;

        if signal.is_empty()
            || signal.iter().any(|v| !v.is_finite())
            || wave::variance(signal) <= VARIANCE_FLOOR
        {
            warn!(channel, "channel is degenerate, emitting placeholder set");
            return ComponentSet {
                channel,
                components: (1..=k).map(Component::placeholder).collect(),
            };
        }

        let signal_mean = wave::mean(signal);
        let mut work = ChannelFit {
            engine: self,
            channel,
            residual: signal.iter().map(|v| v - signal_mean).collect(),
            analyzer: SpectrumAnalyzer::new(self.config.sampling_rate),
            ws: BasisWorkspace::new(signal.len()),
            base_seed: self.config.random_seed.unwrap_or(DEFAULT_SEED),
            cancel,
            components: Vec::with_capacity(k),
        };

        let mut state = FitProgress::Fitting { order: 1 };
        while state != FitProgress::Done {
            state = match state {
                FitProgress::Fitting { order } => work.step(order),
                FitProgress::Padding { from } => {
                    for order in from..=k {
                        work.components.push(Component::placeholder(order));
                    }
                    FitProgress::Done
                }
                accepted => accepted.advance(k),
            };
        }

        debug_assert_eq!(work.components.len(), k);
        ComponentSet {
            channel,
            components: work.components,
        }
    }
}

/// Working state of one channel's decomposition
struct ChannelFit<'a> {
    engine: &'a FmmEngine,
    channel: usize,
    residual: Vec<f64>,
    analyzer: SpectrumAnalyzer,
    ws: BasisWorkspace,
    base_seed: u64,
    cancel: Option<&'a CancellationToken>,
    components: Vec<Component>,
}

impl ChannelFit<'_> {
    /// Fit the component at `order` against the current residual
    fn step(&mut self, order: usize) -> FitProgress {
        if self.cancel.map_or(false, |token| token.is_cancelled()) {
            debug!(channel = self.channel, order, "cancelled before component fit");
            return FitProgress::Padding { from: order };
        }

        let config = &self.engine.config;
        let var_before = wave::variance(&self.residual);
        if !var_before.is_finite() || var_before <= VARIANCE_FLOOR {
            warn!(
                channel = self.channel,
                order, "residual degenerate, padding remaining slots"
            );
            return FitProgress::Padding { from: order };
        }

        let seed = derive_seed(self.base_seed, self.channel, order);
        let Some(initial) = coarse::best_initial_guess(
            config,
            &self.residual,
            &mut self.analyzer,
            seed,
            &mut self.ws,
        ) else {
            warn!(
                channel = self.channel,
                order, "no viable candidate shape, padding remaining slots"
            );
            return FitProgress::Padding { from: order };
        };

        let outcome = self
            .engine
            .fitter
            .fit(&self.residual, config.sampling_rate, initial);

        wave::eval_basis(&outcome.params, config.sampling_rate, &mut self.ws);
        let Some(fit) = wave::linear_fit(&self.residual, &self.ws) else {
            warn!(
                channel = self.channel,
                order, "refined shape is degenerate, padding remaining slots"
            );
            return FitProgress::Padding { from: order };
        };

        fit.subtract_from(&mut self.residual, &self.ws);
        let var_after = wave::variance(&self.residual);
        let r_squared = 1.0 - var_after / var_before;

        if r_squared < config.min_variance_explained {
            debug!(
                channel = self.channel,
                order, r_squared, "contribution below threshold, stopping early"
            );
            return FitProgress::Padding { from: order };
        }

        self.components.push(Component {
            order,
            amplitude: fit.amplitude,
            phase: fit.phase,
            freq_hz: outcome.params.freq_hz,
            alpha: outcome.params.alpha,
            omega: outcome.params.omega,
            r_squared,
            converged: outcome.converged,
        });
        debug!(
            channel = self.channel,
            order,
            freq_hz = outcome.params.freq_hz,
            r_squared,
            converged = outcome.converged,
            iterations = outcome.iterations,
            "fitted component"
        );

        if outcome.converged {
            FitProgress::Converged { order }
        } else {
            FitProgress::Failed { order }
        }
    }
}

/// Distinct deterministic seed per (channel, order) slot
fn derive_seed(base: u64, channel: usize, order: usize) -> u64 {
    base.wrapping_add((channel as u64) << 32)
        .wrapping_add(order as u64)
}
