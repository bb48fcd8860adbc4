//! Decomposition Configuration

use eeg_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Inclusive (min, max) interval for one parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    /// Create a bounds pair
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside, ends included
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Project `value` onto the interval
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Interval width
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Interval midpoint
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigError::MalformedBounds {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Bounds for the modulation parameters of one component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModulationBounds {
    /// Phase translation alpha, inside [0, 2pi]
    pub alpha: Bounds,
    /// Mobius slope omega, inside (0, 1]
    pub omega: Bounds,
}

impl Default for ModulationBounds {
    fn default() -> Self {
        Self {
            alpha: Bounds::new(0.0, TAU),
            omega: Bounds::new(0.05, 1.0),
        }
    }
}

/// Validated configuration of the decomposition engine
///
/// Constructed once, validated once, then shared read-only by every
/// worker in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FmmConfig {
    /// Number of components extracted per channel (K)
    pub n_components: usize,
    /// Sampling rate of the input signals (Hz)
    pub sampling_rate: f64,
    /// Allowed component frequency range (Hz)
    pub frequency_bounds: Bounds,
    /// Allowed ranges of the remaining modulation parameters
    pub modulation_bounds: ModulationBounds,
    /// Iteration cap of the refinement stage
    pub max_iterations: usize,
    /// Relative fit-error improvement below which refinement stops
    pub convergence_tolerance: f64,
    /// Minimum per-component variance fraction to keep extracting
    pub min_variance_explained: f64,
    /// Seed for the randomized coarse-search candidates
    pub random_seed: Option<u64>,
}

impl Default for FmmConfig {
    fn default() -> Self {
        Self {
            n_components: 10,
            sampling_rate: 128.0,
            frequency_bounds: Bounds::new(1.0, 40.0),
            modulation_bounds: ModulationBounds::default(),
            max_iterations: 100,
            convergence_tolerance: 1e-6,
            min_variance_explained: 0.01,
            random_seed: None,
        }
    }
}

impl FmmConfig {
    /// Check every option against its legal range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_components == 0 {
            return Err(ConfigError::NotPositive {
                field: "n_components",
                value: 0.0,
            });
        }
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "sampling_rate",
                value: self.sampling_rate,
            });
        }
        self.frequency_bounds.validate("frequency_bounds")?;
        if self.frequency_bounds.min <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "frequency_bounds.min",
                value: self.frequency_bounds.min,
            });
        }
        let nyquist = self.sampling_rate / 2.0;
        if self.frequency_bounds.max > nyquist {
            return Err(ConfigError::OutOfRange {
                field: "frequency_bounds.max",
                value: self.frequency_bounds.max,
                min: 0.0,
                max: nyquist,
            });
        }
        self.modulation_bounds.alpha.validate("modulation_bounds.alpha")?;
        if self.modulation_bounds.alpha.min < 0.0 || self.modulation_bounds.alpha.max > TAU {
            return Err(ConfigError::OutOfRange {
                field: "modulation_bounds.alpha",
                value: self.modulation_bounds.alpha.max,
                min: 0.0,
                max: TAU,
            });
        }
        self.modulation_bounds.omega.validate("modulation_bounds.omega")?;
        if self.modulation_bounds.omega.min <= 0.0 || self.modulation_bounds.omega.max > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "modulation_bounds.omega",
                value: self.modulation_bounds.omega.min,
                min: 0.0,
                max: 1.0,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_iterations",
                value: 0.0,
            });
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "convergence_tolerance",
                value: self.convergence_tolerance,
            });
        }
        if !self.min_variance_explained.is_finite()
            || !(0.0..1.0).contains(&self.min_variance_explained)
        {
            return Err(ConfigError::OutOfRange {
                field: "min_variance_explained",
                value: self.min_variance_explained,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(FmmConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_components_rejected() {
        let config = FmmConfig {
            n_components: 0,
            ..FmmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "n_components",
                ..
            })
        ));
    }

    #[test]
    fn test_frequency_bounds_above_nyquist_rejected() {
        let config = FmmConfig {
            sampling_rate: 64.0,
            frequency_bounds: Bounds::new(1.0, 40.0),
            ..FmmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                field: "frequency_bounds.max",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = FmmConfig {
            frequency_bounds: Bounds::new(30.0, 5.0),
            ..FmmConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MalformedBounds { .. })
        ));
    }

    #[test]
    fn test_omega_outside_unit_interval_rejected() {
        let mut config = FmmConfig::default();
        config.modulation_bounds.omega = Bounds::new(0.1, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let config = FmmConfig {
            convergence_tolerance: -1.0,
            ..FmmConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
