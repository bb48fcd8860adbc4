//! Fitted Component Types

use serde::{Deserialize, Serialize};

/// One fitted oscillatory term of a channel's decomposition
///
/// The waveform is `amplitude * cos(phase + warp(2*pi*freq_hz*t - alpha))`
/// where `warp` is the Mobius phase warp with slope `omega`. `r_squared`
/// is the fraction of the residual variance this term explained at its
/// extraction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// 1-based extraction order
    pub order: usize,
    /// Waveform amplitude, >= 0
    pub amplitude: f64,
    /// Phase offset beta, in [0, 2pi)
    pub phase: f64,
    /// Component frequency (Hz)
    pub freq_hz: f64,
    /// Phase translation alpha
    pub alpha: f64,
    /// Mobius slope omega
    pub omega: f64,
    /// Variance fraction explained at this step
    pub r_squared: f64,
    /// Whether the refinement stage converged
    pub converged: bool,
}

impl Component {
    /// Zero-amplitude placeholder preserving the set length
    pub fn placeholder(order: usize) -> Self {
        Self {
            order,
            amplitude: 0.0,
            phase: 0.0,
            freq_hz: 0.0,
            alpha: 0.0,
            omega: 0.0,
            r_squared: 0.0,
            converged: false,
        }
    }

    /// Whether this slot was never filled by a real fit
    pub fn is_placeholder(&self) -> bool {
        self.amplitude == 0.0 && !self.converged && self.freq_hz == 0.0
    }
}

/// Ordered components of one channel, always exactly K long
///
/// Order is descending order-of-extraction and never re-sorted. Slots the
/// greedy loop never filled hold placeholders so the length is a pure
/// function of configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSet {
    /// Channel index within the epoch
    pub channel: usize,
    /// Components in extraction order
    pub components: Vec<Component>,
}

impl ComponentSet {
    /// Number of component slots (always K)
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the set holds no slots
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Number of slots whose refinement converged
    pub fn converged_count(&self) -> usize {
        self.components.iter().filter(|c| c.converged).count()
    }

    /// Fraction of the channel's variance explained by all components
    ///
    /// Step R-squareds compound multiplicatively: each applies to the
    /// residual its predecessors left behind.
    pub fn total_variance_explained(&self) -> f64 {
        let unexplained: f64 = self
            .components
            .iter()
            .map(|c| 1.0 - c.r_squared)
            .product();
        1.0 - unexplained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_recognized() {
        let p = Component::placeholder(4);
        assert_eq!(p.order, 4);
        assert_eq!(p.amplitude, 0.0);
        assert!(!p.converged);
        assert!(p.is_placeholder());
    }

    #[test]
    fn test_total_variance_explained_compounds() {
        let mut set = ComponentSet {
            channel: 0,
            components: vec![Component::placeholder(1), Component::placeholder(2)],
        };
        set.components[0].r_squared = 0.5;
        set.components[1].r_squared = 0.5;
        // 50% of the signal, then 50% of the remaining half
        assert!((set.total_variance_explained() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_placeholders_explain_nothing() {
        let set = ComponentSet {
            channel: 2,
            components: (1..=5).map(Component::placeholder).collect(),
        };
        assert_eq!(set.total_variance_explained(), 0.0);
        assert_eq!(set.converged_count(), 0);
    }
}
