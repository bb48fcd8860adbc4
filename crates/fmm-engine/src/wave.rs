//! Mobius-Warped Oscillatory Basis & Linear Solve

use crate::component::Component;
use std::f64::consts::TAU;

/// Modulation parameters of one oscillatory term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    /// Frequency of the underlying phase ramp (Hz)
    pub freq_hz: f64,
    /// Phase translation alpha
    pub alpha: f64,
    /// Mobius slope omega, in (0, 1]
    pub omega: f64,
}

/// Mobius phase warp `2*atan2(omega*sin(x/2), cos(x/2))`
///
/// Maps a uniform phase ramp to a time-varying instantaneous frequency.
/// `omega = 1` is the identity warp (pure sinusoid); smaller values
/// sharpen one flank of each cycle. Periodic in `x` with period 2pi once
/// passed through cos/sin.
pub fn warp_phase(x: f64, omega: f64) -> f64 {
    let half = 0.5 * x;
    2.0 * (omega * half.sin()).atan2(half.cos())
}

/// Reusable cos/sin basis columns for one signal length
pub(crate) struct BasisWorkspace {
    pub cos: Vec<f64>,
    pub sin: Vec<f64>,
}

impl BasisWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            cos: vec![0.0; n],
            sin: vec![0.0; n],
        }
    }
}

/// Fill the workspace with cos/sin of the warped phase at each sample
///
/// Uses the squared-numerator form of the warp: with h = x/2 and
/// N = cos(h) + i*omega*sin(h), exp(i*phi) = N^2 / |N|^2, so the cos/sin
/// pair needs no inverse trigonometry. The denominator is bounded below
/// by min(1, omega^2) and never vanishes for omega > 0.
pub(crate) fn eval_basis(params: &WaveParams, sampling_rate: f64, ws: &mut BasisWorkspace) {
    let omega = params.omega;
    let omega_sq = omega * omega;
    let angular = TAU * params.freq_hz / sampling_rate;
    for i in 0..ws.cos.len() {
        let half = 0.5 * (angular * i as f64 - params.alpha);
        let (sin_h, cos_h) = half.sin_cos();
        let cc = cos_h * cos_h;
        let ss = sin_h * sin_h;
        let denom = cc + omega_sq * ss;
        ws.cos[i] = (cc - omega_sq * ss) / denom;
        ws.sin[i] = 2.0 * omega * sin_h * cos_h / denom;
    }
}

/// Sample the waveform of a fitted component
pub fn component_waveform(
    component: &Component,
    sampling_rate: f64,
    n_samples: usize,
) -> Vec<f64> {
    let params = WaveParams {
        freq_hz: component.freq_hz,
        alpha: component.alpha,
        omega: component.omega.max(f64::MIN_POSITIVE),
    };
    let mut ws = BasisWorkspace::new(n_samples);
    eval_basis(&params, sampling_rate, &mut ws);
    let delta = component.amplitude * component.phase.cos();
    let gamma = -component.amplitude * component.phase.sin();
    (0..n_samples)
        .map(|i| delta * ws.cos[i] + gamma * ws.sin[i])
        .collect()
}

/// Exact least-squares solution of `y ~ intercept + delta*cos + gamma*sin`
#[derive(Debug, Clone, Copy)]
pub(crate) struct LinearFit {
    /// Waveform amplitude `hypot(delta, gamma)`
    pub amplitude: f64,
    /// Phase offset beta in [0, 2pi)
    pub phase: f64,
    /// Fitted intercept
    pub intercept: f64,
    /// Cosine-column weight
    pub delta: f64,
    /// Sine-column weight
    pub gamma: f64,
    /// Explained fraction of the signal's variance
    pub r_squared: f64,
    /// Residual sum of squares after the fit
    pub sse: f64,
}

impl LinearFit {
    /// Subtract the fitted waveform (intercept included) in place
    pub fn subtract_from(&self, residual: &mut [f64], ws: &BasisWorkspace) {
        for i in 0..residual.len() {
            residual[i] -= self.intercept + self.delta * ws.cos[i] + self.gamma * ws.sin[i];
        }
    }
}

/// Solve the three-column least squares via the centered 2x2 system
///
/// Returns None when the signal or basis is degenerate (zero variance,
/// collinear columns, non-finite sums). Because the intercept is part of
/// the model, the fit can never increase the residual variance.
pub(crate) fn linear_fit(
    signal: &[f64],
    ws: &BasisWorkspace,
) -> Option<LinearFit> {
    let n = signal.len();
    if n < 3 {
        return None;
    }
    let nf = n as f64;
    let mean_y = signal.iter().sum::<f64>() / nf;
    let mean_c = ws.cos.iter().sum::<f64>() / nf;
    let mean_s = ws.sin.iter().sum::<f64>() / nf;

    let mut scc = 0.0;
    let mut sss = 0.0;
    let mut scs = 0.0;
    let mut syc = 0.0;
    let mut sys = 0.0;
    let mut syy = 0.0;
    for i in 0..n {
        let dc = ws.cos[i] - mean_c;
        let ds = ws.sin[i] - mean_s;
        let dy = signal[i] - mean_y;
        scc += dc * dc;
        sss += ds * ds;
        scs += dc * ds;
        syc += dy * dc;
        sys += dy * ds;
        syy += dy * dy;
    }

    if !syy.is_finite() || syy <= 0.0 {
        return None;
    }
    let det = scc * sss - scs * scs;
    if !det.is_finite() || det.abs() <= f64::EPSILON * scc * sss {
        return None;
    }

    let delta = (syc * sss - sys * scs) / det;
    let gamma = (sys * scc - syc * scs) / det;
    let explained = delta * syc + gamma * sys;
    let sse = (syy - explained).max(0.0);
    let r_squared = (explained / syy).clamp(0.0, 1.0);
    let intercept = mean_y - delta * mean_c - gamma * mean_s;

    let amplitude = delta.hypot(gamma);
    let mut phase = (-gamma).atan2(delta);
    if phase < 0.0 {
        phase += TAU;
    }

    if !amplitude.is_finite() || !intercept.is_finite() {
        return None;
    }

    Some(LinearFit {
        amplitude,
        phase,
        intercept,
        delta,
        gamma,
        r_squared,
        sse,
    })
}

/// Population mean
pub(crate) fn mean(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().sum::<f64>() / signal.len() as f64
}

/// Population variance
pub(crate) fn variance(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let m = mean(signal);
    signal.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / signal.len() as f64
}
