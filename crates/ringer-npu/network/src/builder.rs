// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology assembly
//!
//! `TopologyBuilder` owns the identifier allocator for the network it builds,
//! so independently built networks never share counters. Defaults for new
//! neurons and synapses come from `NetworkDefaults`.

use ringer_config::{
    ActivationFunction, NetworkConfig, NetworkDefaults, RingerConfig, SynapseStrategyConfig,
};
use ringer_npu_neural::{ActivationStrategy, IdAllocator, NeuronId, SynapseId};
use ringer_npu_plasticity::WeightUpdateStrategy;

use crate::error::Result;
use crate::network::Network;
use crate::neuron::NeuronRole;

/// Incremental network constructor
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    ids: IdAllocator,
    defaults: NetworkDefaults,
    learning: bool,
    network: Network,
}

impl TopologyBuilder {
    pub fn new(defaults: NetworkDefaults) -> Self {
        Self::with_allocator(IdAllocator::new(), defaults)
    }

    /// Start from an explicit allocator state
    pub fn with_allocator(ids: IdAllocator, defaults: NetworkDefaults) -> Self {
        Self {
            ids,
            defaults,
            learning: true,
            network: Network::new(),
        }
    }

    /// Defaults and learning switch from the engine configuration
    pub fn from_config(config: &RingerConfig) -> Self {
        let mut builder = Self::new(config.network.clone());
        builder.learning = config.training.learning;
        builder
    }

    /// Continue editing a dumped network
    ///
    /// Every id in `config` is pinned, so new neurons and synapses are
    /// numbered past the existing ones.
    pub fn resume(config: &NetworkConfig, defaults: NetworkDefaults) -> Result<Self> {
        let mut builder = Self::new(defaults);
        builder.network = Network::from_config(config)?;
        for neuron in &config.neurons {
            builder.ids.pin_neuron(neuron.id);
        }
        for synapse in &config.synapses {
            builder.ids.pin_synapse(synapse.id);
        }
        Ok(builder)
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Add a neuron with the next free id
    pub fn neuron(&mut self, role: NeuronRole) -> Result<NeuronId> {
        let id = self.ids.next_neuron()?;
        self.network.add_neuron(id, role)
    }

    /// Add a neuron under a fixed id
    pub fn neuron_with_id(&mut self, id: u32, role: NeuronRole) -> Result<NeuronId> {
        let id = self.ids.pin_neuron(id);
        self.network.add_neuron(id, role)
    }

    /// Normalising input `(x - subtract) / divide`
    pub fn input(&mut self, subtract: f64, divide: f64) -> Result<NeuronId> {
        self.neuron(NeuronRole::input(subtract, divide)?)
    }

    pub fn input_no_norm(&mut self) -> Result<NeuronId> {
        self.neuron(NeuronRole::InputNoNorm)
    }

    /// Bias neuron broadcasting the configured bias value
    pub fn bias(&mut self) -> Result<NeuronId> {
        let bias = self.defaults.bias;
        self.neuron(NeuronRole::Bias { bias })
    }

    pub fn hidden(&mut self) -> Result<NeuronId> {
        let activation = self.defaults.hidden_activation;
        self.hidden_with(activation)
    }

    pub fn hidden_with(&mut self, activation: ActivationFunction) -> Result<NeuronId> {
        self.neuron(NeuronRole::Hidden {
            activation: ActivationStrategy::new(activation),
        })
    }

    pub fn output(&mut self) -> Result<NeuronId> {
        let activation = self.defaults.output_activation;
        self.output_with(activation)
    }

    pub fn output_with(&mut self, activation: ActivationFunction) -> Result<NeuronId> {
        self.neuron(NeuronRole::Output {
            activation: ActivationStrategy::new(activation),
        })
    }

    /// Connect two neurons with the default weight and learning rule
    pub fn synapse(&mut self, input: NeuronId, output: NeuronId) -> Result<SynapseId> {
        let weight = self.defaults.initial_weight;
        let strategy = self.defaults.synapse_strategy;
        self.synapse_with(input, output, weight, &strategy)
    }

    /// Connect two neurons with an explicit weight and learning rule
    pub fn synapse_with(
        &mut self,
        input: NeuronId,
        output: NeuronId,
        weight: f64,
        strategy: &SynapseStrategyConfig,
    ) -> Result<SynapseId> {
        let rule = WeightUpdateStrategy::from_config(strategy)?;
        let id = self.ids.next_synapse()?;
        self.network.add_synapse(id, weight, rule)?;
        self.network.connect(id, input, output)?;
        if !self.learning {
            self.network.set_synapse_learning(id, false)?;
        }
        Ok(id)
    }

    /// Validate and hand over the assembled network
    pub fn build(self) -> Result<Network> {
        self.network.validate()?;
        Ok(self.network)
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new(NetworkDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringer_config::SynapseStrategyKind;

    #[test]
    fn test_ids_are_sequential() {
        let mut builder = TopologyBuilder::default();
        let a = builder.input(0.0, 1.0).unwrap();
        let b = builder.output().unwrap();
        assert_eq!((a, b), (NeuronId(0), NeuronId(1)));
        assert_eq!(builder.synapse(a, b).unwrap(), SynapseId(0));
    }

    #[test]
    fn test_independent_builders_do_not_collide() {
        let mut first = TopologyBuilder::default();
        first.input_no_norm().unwrap();
        first.input_no_norm().unwrap();
        let mut second = TopologyBuilder::default();
        assert_eq!(second.input_no_norm().unwrap(), NeuronId(0));
    }

    #[test]
    fn test_defaults_applied() {
        let mut config = RingerConfig::default();
        config.network.initial_weight = 0.3;
        config.network.hidden_activation = ActivationFunction::Sigmoid;
        config.network.synapse_strategy = SynapseStrategyConfig::backprop(0.2, 0.1, 0.9);
        let mut builder = TopologyBuilder::from_config(&config);

        let input = builder.input_no_norm().unwrap();
        let hidden = builder.hidden().unwrap();
        let synapse = builder.synapse(input, hidden).unwrap();

        let network = builder.network();
        let s = network.synapse(synapse).unwrap();
        assert_eq!(s.weight(), 0.3);
        assert_eq!(
            ringer_npu_plasticity::WeightUpdate::kind(s.strategy()),
            SynapseStrategyKind::BackProp
        );
        assert_eq!(
            network.neuron(hidden).unwrap().role().activation().map(|a| a.function()),
            Some(ActivationFunction::Sigmoid)
        );
    }

    #[test]
    fn test_pinned_id_advances_allocator() {
        let mut builder = TopologyBuilder::default();
        builder.neuron_with_id(10, NeuronRole::InputNoNorm).unwrap();
        assert_eq!(builder.output().unwrap(), NeuronId(11));
    }

    #[test]
    fn test_build_requires_inputs_and_outputs() {
        let mut builder = TopologyBuilder::default();
        builder.hidden().unwrap();
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_resume_continues_numbering() {
        let mut builder = TopologyBuilder::default();
        let i = builder.input_no_norm().unwrap();
        let o = builder.output().unwrap();
        builder.synapse(i, o).unwrap();
        let config = builder.build().unwrap().dump(None);

        let mut resumed = TopologyBuilder::resume(&config, NetworkDefaults::default()).unwrap();
        assert_eq!(resumed.hidden().unwrap(), NeuronId(2));
        assert_eq!(resumed.allocator().peek_synapse(), Some(SynapseId(1)));
    }

    #[test]
    fn test_resume_with_last_neuron_id() {
        let mut builder = TopologyBuilder::default();
        let i = builder.neuron_with_id(u32::MAX, NeuronRole::InputNoNorm).unwrap();
        let o = builder.neuron_with_id(0, NeuronRole::Output {
            activation: ActivationStrategy::default(),
        })
        .unwrap();
        builder.synapse(i, o).unwrap();
        let config = builder.build().unwrap().dump(None);

        let mut resumed = TopologyBuilder::resume(&config, NetworkDefaults::default()).unwrap();
        assert_eq!(resumed.network().neuron_count(), 2);
        assert!(matches!(
            resumed.hidden(),
            Err(crate::TopologyError::Neural(ringer_npu_neural::NeuralError::IdsExhausted(_)))
        ));
        // synapse ids are unaffected
        assert_eq!(resumed.allocator().peek_synapse(), Some(SynapseId(1)));
    }

    #[test]
    fn test_learning_switch_from_config() {
        let mut config = RingerConfig::default();
        config.training.learning = false;
        let mut builder = TopologyBuilder::from_config(&config);
        let i = builder.input_no_norm().unwrap();
        let o = builder.output().unwrap();
        let s = builder.synapse(i, o).unwrap();
        assert!(!builder.network().synapse(s).unwrap().is_learning());
    }
}
