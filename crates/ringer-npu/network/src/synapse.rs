// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapses
//!
//! A synapse carries a weight and owns its learning rule. Forward, it scales
//! the presynaptic ensemble by the weight. Backward, it asks its rule for a
//! weight change, applies it when learning is enabled, and hands the lesson
//! scaled by the pre-update weight back to the presynaptic neuron.

use ringer_config::SynapseConfig;
use ringer_npu_neural::{Ensemble, NeuronId, SynapseId};
use ringer_npu_plasticity::{WeightUpdate, WeightUpdateStrategy};

use crate::error::Result;

/// One weighted edge of the graph
#[derive(Debug, Clone)]
pub struct Synapse {
    id: SynapseId,
    weight: f64,
    input: Option<NeuronId>,
    output: Option<NeuronId>,
    learning: bool,
    strategy: WeightUpdateStrategy,
}

impl Synapse {
    pub fn new(id: SynapseId, weight: f64, strategy: WeightUpdateStrategy) -> Self {
        Self {
            id,
            weight,
            input: None,
            output: None,
            learning: true,
            strategy,
        }
    }

    /// Build an unconnected synapse from its dumped form
    ///
    /// The endpoints in `config` are left for the network to bind.
    pub fn from_config(config: &SynapseConfig) -> Result<Self> {
        let strategy = WeightUpdateStrategy::from_config(&config.strategy)?;
        let mut synapse = Self::new(SynapseId(config.id), config.weight, strategy);
        synapse.learning = config.learning;
        Ok(synapse)
    }

    pub fn id(&self) -> SynapseId {
        self.id
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn input(&self) -> Option<NeuronId> {
        self.input
    }

    pub fn output(&self) -> Option<NeuronId> {
        self.output
    }

    pub fn is_connected(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    /// Enable or disable weight adaptation for future lessons
    pub fn learning(&mut self, enabled: bool) {
        self.learning = enabled;
    }

    pub fn strategy(&self) -> &WeightUpdateStrategy {
        &self.strategy
    }

    pub(crate) fn bind(&mut self, input: NeuronId, output: NeuronId) {
        self.input = Some(input);
        self.output = Some(output);
    }

    pub(crate) fn unbind(&mut self) -> (Option<NeuronId>, Option<NeuronId>) {
        (self.input.take(), self.output.take())
    }

    /// Forward payload for the postsynaptic neuron
    pub fn transmit(&self, data: &Ensemble) -> Ensemble {
        data * self.weight
    }

    /// Apply one lesson; returns the error owed to the presynaptic neuron
    ///
    /// `input` is the presynaptic neuron's current state.
    pub fn adapt(&mut self, input: &Ensemble, lesson: &Ensemble) -> Ensemble {
        let back = lesson * self.weight;
        if self.learning {
            let delta = self.strategy.teach(input, lesson);
            self.weight += delta;
            tracing::trace!(target: "ringer-npu-network",
                "{} weight += {:.6} -> {:.6}", self.id, delta, self.weight);
        }
        back
    }

    pub fn dump(&self) -> SynapseConfig {
        SynapseConfig {
            id: self.id.0,
            input: self.input.map(|n| n.0),
            output: self.output.map(|n| n.0),
            weight: self.weight,
            learning: self.learning,
            strategy: self.strategy.dump(),
        }
    }

    /// Graphviz edge statement, `None` while unconnected
    pub fn dot(&self) -> Option<String> {
        let (input, output) = (self.input?, self.output?);
        Some(format!(
            "{}:output -> {}:input [label=\"({}) {}\"] ;",
            input.0, output.0, self.id.0, self.weight
        ))
    }
}

impl PartialEq for Synapse {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Synapse {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ringer_config::SynapseStrategyConfig;

    fn synapse(weight: f64) -> Synapse {
        Synapse::new(
            SynapseId(1),
            weight,
            WeightUpdateStrategy::from_config(&SynapseStrategyConfig::rprop(0.1)).unwrap(),
        )
    }

    #[test]
    fn test_transmit_scales_by_weight() {
        let s = synapse(0.5);
        assert_eq!(s.transmit(&array![2.0, -4.0]), array![1.0, -2.0]);
    }

    #[test]
    fn test_adapt_uses_pre_update_weight() {
        let mut s = synapse(0.5);
        let back = s.adapt(&array![1.0], &array![2.0]);
        assert_eq!(back, array![1.0]);
        assert!((s.weight() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_learning_disabled_keeps_weight() {
        let mut s = synapse(0.5);
        s.learning(false);
        let back = s.adapt(&array![1.0], &array![2.0]);
        assert_eq!(back, array![1.0]);
        assert_eq!(s.weight(), 0.5);
        // rule state untouched as well
        assert_eq!(s.strategy().dump(), SynapseStrategyConfig::rprop(0.1));
    }

    #[test]
    fn test_dump_and_reload() {
        let mut s = synapse(-0.25);
        s.bind(NeuronId(3), NeuronId(4));
        s.adapt(&array![1.0, 1.0], &array![-1.0, 0.5]);
        let config = s.dump();
        assert_eq!(config.input, Some(3));
        assert_eq!(config.output, Some(4));

        let reloaded = Synapse::from_config(&config).unwrap();
        assert_eq!(reloaded.weight(), s.weight());
        assert_eq!(reloaded.strategy(), s.strategy());
        assert!(!reloaded.is_connected());
    }

    #[test]
    fn test_equality_by_id() {
        assert_eq!(synapse(0.1), synapse(0.9));
    }
}
