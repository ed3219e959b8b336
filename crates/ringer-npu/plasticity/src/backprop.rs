// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Back-propagation with momentum and learning-rate decay
//!
//! The raw step is `learning_rate * mean(lesson ⊙ input)`. The returned delta
//! blends it with the previous raw step through the momentum term. The
//! learning rate then grows slightly while steps keep shrinking (or flip
//! direction) and is multiplied by `decay` once a step exceeds its
//! predecessor. The adapted rate stays within the positive finite range, so
//! a dumped rule can always be rebuilt.

use ringer_config::SynapseStrategyConfig;
use ringer_npu_neural::Ensemble;

use crate::mean_product;

/// Momentum back-propagation state for one synapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseBackProp {
    learning_rate: f64,
    momentum: f64,
    decay: f64,
    previous_delta: f64,
}

impl SynapseBackProp {
    pub fn new(learning_rate: f64, momentum: f64, decay: f64) -> Self {
        Self::with_history(learning_rate, momentum, decay, 0.0)
    }

    /// Resume from a dumped state
    pub fn with_history(learning_rate: f64, momentum: f64, decay: f64, previous_delta: f64) -> Self {
        Self {
            learning_rate,
            momentum,
            decay,
            previous_delta,
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn previous_delta(&self) -> f64 {
        self.previous_delta
    }

    /// Compute the weight change for one training step
    pub fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64 {
        let raw = self.learning_rate * mean_product(input, lesson);
        let delta = (1.0 - self.momentum) * raw + self.momentum * self.previous_delta;

        if raw <= self.previous_delta {
            self.learning_rate *= 1.0 + (1.0 - self.decay) / 10.0;
        } else {
            self.learning_rate *= self.decay;
        }
        self.learning_rate = self.learning_rate.clamp(f64::MIN_POSITIVE, f64::MAX);
        self.previous_delta = raw;

        tracing::trace!(target: "ringer-npu-plasticity",
            "backprop raw={:.6} delta={:.6} lr={:.6}", raw, delta, self.learning_rate);
        delta
    }

    pub fn dump(&self) -> SynapseStrategyConfig {
        SynapseStrategyConfig::BackProp {
            learning_rate: self.learning_rate,
            momentum: self.momentum,
            decay: self.decay,
            previous_delta: self.previous_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_first_step_without_momentum() {
        let mut rule = SynapseBackProp::new(0.5, 0.0, 0.9);
        let delta = rule.teach(&array![1.0, 1.0], &array![0.2, 0.4]);
        assert!((delta - 0.15).abs() < 1e-12);
        assert!((rule.previous_delta() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_momentum_blends_previous_step() {
        let mut rule = SynapseBackProp::new(1.0, 0.5, 1.0);
        let first = rule.teach(&array![1.0], &array![1.0]);
        assert!((first - 0.5).abs() < 1e-12);
        // decay 1.0 keeps the rate fixed, so raw is 1.0 again
        let second = rule.teach(&array![1.0], &array![1.0]);
        assert!((second - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rate_grows_while_steps_shrink() {
        let mut rule = SynapseBackProp::new(0.1, 0.2, 0.9);
        let mut last = rule.learning_rate();
        for _ in 0..10 {
            rule.teach(&array![1.0, 1.0], &array![-0.5, -0.5]);
            assert!(rule.learning_rate() > last);
            last = rule.learning_rate();
        }
    }

    #[test]
    fn test_rate_decays_while_steps_grow() {
        let mut rule = SynapseBackProp::new(0.1, 0.2, 0.9);
        let mut last = rule.learning_rate();
        let mut lesson = 1.0;
        for _ in 0..10 {
            rule.teach(&array![1.0], &array![lesson]);
            assert!(rule.learning_rate() < last);
            last = rule.learning_rate();
            lesson *= 2.0;
        }
    }

    #[test]
    fn test_rate_never_leaves_positive_range() {
        let mut shrinking = SynapseBackProp::new(0.1, 0.1, 0.5);
        for step in 0..4000 {
            let lesson = if step % 2 == 0 { 1.0 } else { -1.0 };
            shrinking.teach(&array![1.0], &array![lesson]);
        }
        assert!(shrinking.learning_rate() >= f64::MIN_POSITIVE);

        let mut growing = SynapseBackProp::with_history(f64::MAX * 0.95, 0.0, 0.01, 0.0);
        growing.teach(&array![1.0], &array![-1.0]);
        assert_eq!(growing.learning_rate(), f64::MAX);
    }

    #[test]
    fn test_dump_carries_history() {
        let mut rule = SynapseBackProp::new(0.1, 0.3, 0.95);
        rule.teach(&array![2.0], &array![1.0]);
        match rule.dump() {
            SynapseStrategyConfig::BackProp {
                learning_rate,
                momentum,
                decay,
                previous_delta,
            } => {
                assert_eq!(learning_rate, rule.learning_rate());
                assert_eq!(momentum, 0.3);
                assert_eq!(decay, 0.95);
                assert!((previous_delta - 0.2).abs() < 1e-12);
            }
            other => panic!("unexpected dump {:?}", other),
        }
    }
}
