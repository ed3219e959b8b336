// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight update strategy selection
//!
//! `WeightUpdate` is the seam synapses call through; `WeightUpdateStrategy`
//! is the closed set of rules a synapse can own, built from a
//! `SynapseStrategyConfig` and dumped back into one.

use ringer_config::{validate_synapse_strategy, SynapseStrategyConfig, SynapseStrategyKind};
use ringer_npu_neural::{Ensemble, NeuralError};

use crate::{SynapseBackProp, SynapseRProp};

/// A rule turning presynaptic data and a lesson into a weight change
pub trait WeightUpdate {
    /// Weight change for one training step, updating internal history
    fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64;

    /// Parameters and history needed to rebuild this rule
    fn dump(&self) -> SynapseStrategyConfig;

    fn kind(&self) -> SynapseStrategyKind;
}

impl WeightUpdate for SynapseBackProp {
    fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64 {
        SynapseBackProp::teach(self, input, lesson)
    }

    fn dump(&self) -> SynapseStrategyConfig {
        SynapseBackProp::dump(self)
    }

    fn kind(&self) -> SynapseStrategyKind {
        SynapseStrategyKind::BackProp
    }
}

impl WeightUpdate for SynapseRProp {
    fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64 {
        SynapseRProp::teach(self, input, lesson)
    }

    fn dump(&self) -> SynapseStrategyConfig {
        SynapseRProp::dump(self)
    }

    fn kind(&self) -> SynapseStrategyKind {
        SynapseStrategyKind::RProp
    }
}

/// Rule owned by a synapse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightUpdateStrategy {
    BackProp(SynapseBackProp),
    RProp(SynapseRProp),
}

impl WeightUpdateStrategy {
    /// Build a rule from its configuration, including any dumped history
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when a parameter is outside its valid range
    pub fn from_config(config: &SynapseStrategyConfig) -> Result<Self, NeuralError> {
        let mut errors = Vec::new();
        validate_synapse_strategy("strategy", config, &mut errors);
        if let Some(first) = errors.first() {
            return Err(NeuralError::InvalidParameter {
                name: "synapse strategy",
                reason: first.to_string(),
            });
        }

        Ok(match *config {
            SynapseStrategyConfig::BackProp {
                learning_rate,
                momentum,
                decay,
                previous_delta,
            } => WeightUpdateStrategy::BackProp(SynapseBackProp::with_history(
                learning_rate,
                momentum,
                decay,
                previous_delta,
            )),
            SynapseStrategyConfig::RProp {
                weight_update,
                increase,
                decrease,
                min_step,
                max_step,
                previous_delta,
                previous_derivative,
            } => WeightUpdateStrategy::RProp(
                SynapseRProp::with_bounds(weight_update, increase, decrease, min_step, max_step)
                    .with_history(previous_delta, previous_derivative),
            ),
        })
    }

    /// Default-parameter rule selected by name (`"backprop"`, `"rprop"`)
    ///
    /// # Errors
    ///
    /// Unknown names fail with the configuration error naming them
    pub fn from_name(name: &str) -> Result<Self, NeuralError> {
        let kind: SynapseStrategyKind = name.parse()?;
        Self::from_config(&SynapseStrategyConfig::default_for(kind))
    }

    fn rule(&self) -> &dyn WeightUpdate {
        match self {
            WeightUpdateStrategy::BackProp(rule) => rule,
            WeightUpdateStrategy::RProp(rule) => rule,
        }
    }

    fn rule_mut(&mut self) -> &mut dyn WeightUpdate {
        match self {
            WeightUpdateStrategy::BackProp(rule) => rule,
            WeightUpdateStrategy::RProp(rule) => rule,
        }
    }
}

impl WeightUpdate for WeightUpdateStrategy {
    fn teach(&mut self, input: &Ensemble, lesson: &Ensemble) -> f64 {
        self.rule_mut().teach(input, lesson)
    }

    fn dump(&self) -> SynapseStrategyConfig {
        self.rule().dump()
    }

    fn kind(&self) -> SynapseStrategyKind {
        self.rule().kind()
    }
}

impl Default for WeightUpdateStrategy {
    fn default() -> Self {
        WeightUpdateStrategy::RProp(SynapseRProp::new(ringer_config::RPROP_INITIAL_STEP))
    }
}
