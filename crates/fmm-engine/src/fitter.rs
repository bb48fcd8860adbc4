//! Component Refinement
//!
//! Bounded non-linear least squares for one component's modulation
//! parameters. The linear part (amplitude, phase, intercept) is solved
//! exactly at every probe, so the search space is only (frequency, alpha,
//! omega). Deterministic compass search: probe one step up and down per
//! coordinate, take the best improving move, halve all steps on a stall.

use crate::config::{Bounds, FmmConfig};
use crate::wave::{eval_basis, linear_fit, BasisWorkspace, WaveParams};

/// Stalled sweeps after this many step halvings count as converged; at
/// that point the remaining improvement is below any useful resolution
const MAX_STEP_HALVINGS: usize = 12;
/// Initial step sizes as fractions of each parameter's span
const FREQ_STEP_FRACTION: f64 = 0.02;
const ALPHA_STEP_FRACTION: f64 = 0.0625;
const OMEGA_STEP_FRACTION: f64 = 0.1;

/// Result of one refinement run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    /// Best parameters found, always inside the configured bounds
    pub params: WaveParams,
    /// True when the relative fit-error improvement fell below tolerance
    pub converged: bool,
    /// Probe sweeps performed
    pub iterations: usize,
}

/// Fits one component's modulation parameters to a residual signal
#[derive(Debug, Clone)]
pub struct ComponentFitter {
    frequency_bounds: Bounds,
    alpha_bounds: Bounds,
    omega_bounds: Bounds,
    max_iterations: usize,
    tolerance: f64,
}

impl ComponentFitter {
    /// Build a fitter from a validated configuration
    pub fn new(config: &FmmConfig) -> Self {
        Self {
            frequency_bounds: config.frequency_bounds,
            alpha_bounds: config.modulation_bounds.alpha,
            omega_bounds: config.modulation_bounds.omega,
            max_iterations: config.max_iterations,
            tolerance: config.convergence_tolerance,
        }
    }

    /// Refine `initial` against `residual`
    ///
    /// Parameters are projected back onto their bounds after every move.
    /// Identical inputs always produce identical output.
    pub fn fit(&self, residual: &[f64], sampling_rate: f64, initial: WaveParams) -> FitOutcome {
        let bounds = [self.frequency_bounds, self.alpha_bounds, self.omega_bounds];
        let mut point = [
            bounds[0].clamp(initial.freq_hz),
            bounds[1].clamp(initial.alpha),
            bounds[2].clamp(initial.omega),
        ];
        let mut ws = BasisWorkspace::new(residual.len());

        let objective = |p: &[f64; 3], ws: &mut BasisWorkspace| -> f64 {
            eval_basis(&to_params(p), sampling_rate, ws);
            linear_fit(residual, ws).map_or(f64::INFINITY, |fit| fit.sse)
        };

        let mut best_sse = objective(&point, &mut ws);
        if !best_sse.is_finite() {
            return FitOutcome {
                params: to_params(&point),
                converged: false,
                iterations: 0,
            };
        }

        let mut steps = [
            bounds[0].span() * FREQ_STEP_FRACTION,
            bounds[1].span() * ALPHA_STEP_FRACTION,
            bounds[2].span() * OMEGA_STEP_FRACTION,
        ];
        let mut halvings = 0;

        for iteration in 1..=self.max_iterations {
            let mut best_move: Option<([f64; 3], f64)> = None;
            for coord in 0..3 {
                for direction in [-1.0, 1.0] {
                    let mut probe = point;
                    probe[coord] = bounds[coord].clamp(probe[coord] + direction * steps[coord]);
                    if probe[coord] == point[coord] {
                        continue;
                    }
                    let sse = objective(&probe, &mut ws);
                    if sse < best_sse && best_move.map_or(true, |(_, s)| sse < s) {
                        best_move = Some((probe, sse));
                    }
                }
            }

            match best_move {
                Some((next, sse)) => {
                    // best_sse > 0 here: a probe can only beat a zero
                    // objective if its own error were negative
                    let relative = (best_sse - sse) / best_sse;
                    point = next;
                    best_sse = sse;
                    if relative < self.tolerance || best_sse == 0.0 {
                        return FitOutcome {
                            params: to_params(&point),
                            converged: true,
                            iterations: iteration,
                        };
                    }
                }
                None => {
                    if halvings >= MAX_STEP_HALVINGS {
                        return FitOutcome {
                            params: to_params(&point),
                            converged: true,
                            iterations: iteration,
                        };
                    }
                    for step in &mut steps {
                        *step *= 0.5;
                    }
                    halvings += 1;
                }
            }
        }

        FitOutcome {
            params: to_params(&point),
            converged: false,
            iterations: self.max_iterations,
        }
    }
}

fn to_params(p: &[f64; 3]) -> WaveParams {
    WaveParams {
        freq_hz: p[0],
        alpha: p[1],
        omega: p[2],
    }
}
