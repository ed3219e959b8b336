// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resilient propagation (RProp)
//!
//! Only the sign of the gradient `mean(lesson ⊙ input)` is used. The step size
//! grows by `increase` while consecutive gradients agree in sign and shrinks
//! by `decrease` when they disagree, always staying within
//! `[min_step, max_step]`.

use ringer_config::{
    SynapseStrategyConfig, RPROP_DECREASE, RPROP_INCREASE, RPROP_MAX_STEP, RPROP_MIN_STEP,
};
use ringer_npu_neural::Ensemble;

use crate::mean_product;

/// RProp state for one synapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseRProp {
    step: f64,
    increase: f64,
    decrease: f64,
    min_step: f64,
    max_step: f64,
    previous_delta: f64,
    previous_derivative: f64,
}

impl SynapseRProp {
    /// Published factors and bounds, starting from `weight_update`
    pub fn new(weight_update: f64) -> Self {
        Self::with_bounds(
            weight_update,
            RPROP_INCREASE,
            RPROP_DECREASE,
            RPROP_MIN_STEP,
            RPROP_MAX_STEP,
        )
    }

    /// Custom factors; the initial step is clamped into the bounds
    pub fn with_bounds(
        weight_update: f64,
        increase: f64,
        decrease: f64,
        min_step: f64,
        max_step: f64,
    ) -> Self {
        Self {
            step: weight_update.clamp(min_step, max_step),
            increase,
            decrease,
            min_step,
            max_step,
            previous_delta: 0.0,
            previous_derivative: 0.0,
        }
    }

    /// Resume with the history of an earlier run
    pub fn with_history(mut self, previous_delta: f64, previous_derivative: f64) -> Self {
        self.previous_delta = previous_delta;
        self.previous_derivative = previous_derivative;
        self
    }

    /// Rebuild from dumped parameters and history
    pub fn from_config(config: &SynapseStrategyConfig) -> Option<Self> {
        match *config {
            SynapseStrategyConfig::RProp {
                weight_update,
                increase,
                decrease,
                min_step,
                max_step,
                previous_delta,
                previous_derivative,
            } => {
                Some(
                    Self::with_bounds(weight_update, increase, decrease, min_step, max_step)
                        .with_history(previous_delta, previous_derivative),
                )
            }
            SynapseStrategyConfig::BackProp { .. } => None,
        }
    }

    /// Current step size
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn previous_delta(&self) -> f64 {
        self.previous_delta
    }

    pub fn previous_derivative(&self) -> f64 {
        self.previous_derivative
    }

    /// Compute the weight change for one training step
    pub fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64 {
        let gradient = mean_product(input, lesson);
        let agreement = gradient * self.previous_derivative;

        if agreement > 0.0 {
            self.step = (self.step * self.increase).min(self.max_step);
        } else if agreement < 0.0 {
            self.step = (self.step * self.decrease).max(self.min_step);
            tracing::trace!(target: "ringer-npu-plasticity",
                "gradient sign flipped, step shrinks to {:.6}", self.step);
        }

        let delta = if gradient > 0.0 {
            self.step
        } else if gradient < 0.0 {
            -self.step
        } else {
            0.0
        };

        self.previous_delta = delta;
        self.previous_derivative = gradient;
        delta
    }

    pub fn dump(&self) -> SynapseStrategyConfig {
        SynapseStrategyConfig::RProp {
            weight_update: self.step,
            increase: self.increase,
            decrease: self.decrease,
            min_step: self.min_step,
            max_step: self.max_step,
            previous_delta: self.previous_delta,
            previous_derivative: self.previous_derivative,
        }
    }
}
