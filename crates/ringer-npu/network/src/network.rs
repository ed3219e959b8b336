// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network arena and batched execution
//!
//! Neurons and synapses live in two vectors and refer to each other by id.
//! Each id maps to its current slot, so lookups stay O(1) and removal is a
//! `swap_remove` plus one slot fix-up.
//!
//! A pass is a synchronous recursive walk: `run_neuron` fires into `pass`,
//! which runs the next neuron, and so on until the outputs. Training mirrors
//! this through `train_neuron` and `learn`. Only one pass may be in flight at
//! a time, which `&mut self` guarantees.

use ahash::AHashMap;
use ringer_config::{validate_network_config, Header, NetworkConfig};
use ringer_npu_neural::{
    ensembles_to_patterns, mse, patterns_to_ensembles, Ensemble, NeuralError,
    NeuronId, Pattern, SynapseId,
};
use ringer_npu_plasticity::WeightUpdateStrategy;
use tracing::{debug, info, warn};

use crate::error::{Result, TopologyError};
use crate::neuron::{Neuron, NeuronRole};
use crate::synapse::Synapse;

/// Outcome of a training call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingReport {
    pub epochs: usize,
    /// MSE of the forward pass that opened each epoch
    pub mse_per_epoch: Vec<f64>,
}

impl TrainingReport {
    pub fn first_mse(&self) -> Option<f64> {
        self.mse_per_epoch.first().copied()
    }

    pub fn last_mse(&self) -> Option<f64> {
        self.mse_per_epoch.last().copied()
    }
}

/// Owner of every neuron and synapse of one graph
#[derive(Debug, Clone, Default)]
pub struct Network {
    neurons: Vec<Neuron>,
    synapses: Vec<Synapse>,
    neuron_slots: AHashMap<NeuronId, usize>,
    synapse_slots: AHashMap<SynapseId, usize>,
    /// Pattern-fed inputs, in pattern column order
    inputs: Vec<NeuronId>,
    biases: Vec<NeuronId>,
    outputs: Vec<NeuronId>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a dumped network, keeping every identifier
    ///
    /// # Errors
    ///
    /// Validation failures of `config`, or roles and strategies that cannot
    /// be built
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        validate_network_config(config)?;
        let mut network = Network::new();

        for neuron in &config.neurons {
            network.add_neuron(NeuronId(neuron.id), NeuronRole::from_config(&neuron.role)?)?;
        }
        for synapse in &config.synapses {
            network.insert_synapse(Synapse::from_config(synapse)?)?;
            match (synapse.input, synapse.output) {
                (Some(input), Some(output)) => {
                    network.connect(SynapseId(synapse.id), NeuronId(input), NeuronId(output))?
                }
                _ => warn!(target: "ringer-npu-network",
                    "Synapse({}) has a missing endpoint, left unconnected", synapse.id),
            }
        }

        debug!(target: "ringer-npu-network",
            "Rebuilt network with {} neurons, {} synapses",
            network.neuron_count(), network.synapse_count());
        Ok(network)
    }

    /// Describe the whole graph, ordered by id
    pub fn dump(&self, header: Option<Header>) -> NetworkConfig {
        let mut neurons: Vec<_> = self.neurons.iter().map(Neuron::dump).collect();
        neurons.sort_by_key(|n| n.id);
        let mut synapses: Vec<_> = self.synapses.iter().map(Synapse::dump).collect();
        synapses.sort_by_key(|s| s.id);
        NetworkConfig {
            header,
            neurons,
            synapses,
        }
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    pub fn add_neuron(&mut self, id: NeuronId, role: NeuronRole) -> Result<NeuronId> {
        if self.neuron_slots.contains_key(&id) {
            return Err(TopologyError::DuplicateNeuronId(id.0));
        }
        if role.takes_pattern_data() {
            self.inputs.push(id);
        } else if let NeuronRole::Bias { .. } = role {
            self.biases.push(id);
        } else if role.is_output() {
            self.outputs.push(id);
        }
        self.neuron_slots.insert(id, self.neurons.len());
        self.neurons.push(Neuron::new(id, role));
        Ok(id)
    }

    pub fn add_synapse(
        &mut self,
        id: SynapseId,
        weight: f64,
        strategy: WeightUpdateStrategy,
    ) -> Result<SynapseId> {
        self.insert_synapse(Synapse::new(id, weight, strategy))
    }

    fn insert_synapse(&mut self, synapse: Synapse) -> Result<SynapseId> {
        let id = synapse.id();
        if self.synapse_slots.contains_key(&id) {
            return Err(TopologyError::DuplicateSynapseId(id.0));
        }
        self.synapse_slots.insert(id, self.synapses.len());
        self.synapses.push(synapse);
        Ok(id)
    }

    /// Bind `synapse` from `input` to `output`
    ///
    /// Re-binding to the same endpoints is a diagnostic no-op. An edge the
    /// roles forbid (into an input, out of an output) is ignored with a
    /// diagnostic and leaves the synapse unconnected.
    ///
    /// # Errors
    ///
    /// Unknown ids, or a synapse already bound to different endpoints
    pub fn connect(&mut self, synapse: SynapseId, input: NeuronId, output: NeuronId) -> Result<()> {
        let s = self.synapse_slot(synapse)?;
        let i = self.neuron_slot(input)?;
        let o = self.neuron_slot(output)?;

        let current = &self.synapses[s];
        if current.is_connected() {
            if current.input() == Some(input) && current.output() == Some(output) {
                warn!(target: "ringer-npu-network",
                    "{} already connects {} -> {}, ignored", synapse, input, output);
                return Ok(());
            }
            return Err(TopologyError::SynapseAlreadyConnected {
                synapse,
                input: current.input(),
                output: current.output(),
            });
        }

        if !self.neurons[i].role().accepts_outgoing() || !self.neurons[o].role().accepts_incoming()
        {
            warn!(target: "ringer-npu-network",
                "{} -> {} is not a valid edge for {}, ignored", input, output, synapse);
            return Ok(());
        }

        self.neurons[i].out_connect(synapse);
        self.neurons[o].in_connect(synapse);
        self.synapses[s].bind(input, output);
        Ok(())
    }

    /// Unbind whichever endpoints `synapse` currently has
    pub fn disconnect(&mut self, synapse: SynapseId) -> Result<()> {
        let s = self.synapse_slot(synapse)?;
        let (input, output) = self.synapses[s].unbind();
        if input.is_none() && output.is_none() {
            warn!(target: "ringer-npu-network", "{} is not connected, ignored", synapse);
        }
        if let Some(slot) = input.and_then(|id| self.neuron_slots.get(&id).copied()) {
            self.neurons[slot].out_disconnect(synapse);
        }
        if let Some(slot) = output.and_then(|id| self.neuron_slots.get(&id).copied()) {
            self.neurons[slot].in_disconnect(synapse);
        }
        Ok(())
    }

    /// Remove an unconnected neuron
    ///
    /// # Errors
    ///
    /// `NeuronStillConnected` when synapses are still attached; the graph is
    /// left untouched
    pub fn remove_neuron(&mut self, id: NeuronId) -> Result<Neuron> {
        let slot = self.neuron_slot(id)?;
        let neuron = &self.neurons[slot];
        if neuron.is_connected() {
            return Err(TopologyError::NeuronStillConnected {
                neuron: id,
                incoming: neuron.fan_in(),
                outgoing: neuron.fan_out(),
            });
        }

        self.neuron_slots.remove(&id);
        let removed = self.neurons.swap_remove(slot);
        if let Some(moved) = self.neurons.get(slot) {
            self.neuron_slots.insert(moved.id(), slot);
        }
        self.inputs.retain(|n| *n != id);
        self.biases.retain(|n| *n != id);
        self.outputs.retain(|n| *n != id);
        Ok(removed)
    }

    /// Disconnect and remove a synapse
    pub fn remove_synapse(&mut self, id: SynapseId) -> Result<Synapse> {
        let slot = self.synapse_slot(id)?;
        if self.synapses[slot].is_connected() {
            self.disconnect(id)?;
        }
        self.synapse_slots.remove(&id);
        let removed = self.synapses.swap_remove(slot);
        if let Some(moved) = self.synapses.get(slot) {
            self.synapse_slots.insert(moved.id(), slot);
        }
        Ok(removed)
    }

    /// Disconnect every synapse, then drop all synapses and neurons
    pub fn teardown(&mut self) {
        debug!(target: "ringer-npu-network",
            "Tearing down {} neurons, {} synapses", self.neurons.len(), self.synapses.len());
        let synapses: Vec<SynapseId> = self.synapses.iter().map(Synapse::id).collect();
        for id in synapses {
            if let Err(e) = self.remove_synapse(id) {
                warn!(target: "ringer-npu-network", "teardown: {}", e);
            }
        }
        let neurons: Vec<NeuronId> = self.neurons.iter().map(Neuron::id).collect();
        for id in neurons {
            if let Err(e) = self.remove_neuron(id) {
                warn!(target: "ringer-npu-network", "teardown: {}", e);
            }
        }
    }

    pub fn neuron(&self, id: NeuronId) -> Option<&Neuron> {
        self.neuron_slots.get(&id).map(|slot| &self.neurons[*slot])
    }

    pub fn synapse(&self, id: SynapseId) -> Option<&Synapse> {
        self.synapse_slots.get(&id).map(|slot| &self.synapses[*slot])
    }

    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.neurons.iter()
    }

    pub fn synapses(&self) -> impl Iterator<Item = &Synapse> {
        self.synapses.iter()
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Pattern-fed input neurons, in column order
    pub fn inputs(&self) -> &[NeuronId] {
        &self.inputs
    }

    pub fn biases(&self) -> &[NeuronId] {
        &self.biases
    }

    pub fn outputs(&self) -> &[NeuronId] {
        &self.outputs
    }

    /// Toggle weight adaptation on every synapse
    pub fn set_learning(&mut self, enabled: bool) {
        for synapse in &mut self.synapses {
            synapse.learning(enabled);
        }
    }

    /// Toggle weight adaptation on one synapse
    pub fn set_synapse_learning(&mut self, id: SynapseId, enabled: bool) -> Result<()> {
        let slot = self.synapse_slot(id)?;
        self.synapses[slot].learning(enabled);
        Ok(())
    }

    /// Check the graph can run
    ///
    /// Dangling hidden and output neurons are reported as warnings.
    ///
    /// # Errors
    ///
    /// `Invalid` when there are no inputs or no outputs
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(TopologyError::Invalid("network has no inputs".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(TopologyError::Invalid("network has no outputs".to_string()));
        }
        for neuron in &self.neurons {
            match neuron.role() {
                NeuronRole::Hidden { .. } if neuron.fan_out() == 0 => {
                    warn!(target: "ringer-npu-network", "{} (hidden) feeds nothing", neuron.id())
                }
                NeuronRole::Hidden { .. } | NeuronRole::Output { .. } if neuron.fan_in() == 0 => {
                    warn!(target: "ringer-npu-network",
                        "{} ({}) receives nothing", neuron.id(), neuron.role().name())
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn neuron_slot(&self, id: NeuronId) -> Result<usize> {
        self.neuron_slots
            .get(&id)
            .copied()
            .ok_or(TopologyError::NeuronNotFound(id))
    }

    fn synapse_slot(&self, id: SynapseId) -> Result<usize> {
        self.synapse_slots
            .get(&id)
            .copied()
            .ok_or(TopologyError::SynapseNotFound(id))
    }

    // ------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------

    /// Deliver one contribution to a neuron, firing downstream if it opens
    pub fn run_neuron(&mut self, id: NeuronId, data: &Ensemble) -> Result<()> {
        let slot = self.neuron_slot(id)?;
        if let Some(state) = self.neurons[slot].accept(data) {
            let outgoing = self.neurons[slot].outputs().to_vec();
            for synapse in outgoing {
                self.pass(synapse, &state)?;
            }
        }
        Ok(())
    }

    /// Forward transport over one synapse
    pub fn pass(&mut self, synapse: SynapseId, data: &Ensemble) -> Result<()> {
        let slot = self.synapse_slot(synapse)?;
        let s = &self.synapses[slot];
        match s.output() {
            Some(output) => {
                let payload = s.transmit(data);
                self.run_neuron(output, &payload)
            }
            None => {
                warn!(target: "ringer-npu-network", "{} has no output, data dropped", synapse);
                Ok(())
            }
        }
    }

    /// Backward transport over one synapse
    pub fn learn(&mut self, synapse: SynapseId, lesson: &Ensemble) -> Result<()> {
        let slot = self.synapse_slot(synapse)?;
        let Some(input) = self.synapses[slot].input() else {
            warn!(target: "ringer-npu-network", "{} has no input, lesson dropped", synapse);
            return Ok(());
        };
        let input_slot = self.neuron_slot(input)?;
        let back = self.synapses[slot].adapt(self.neurons[input_slot].state(), lesson);
        self.train_neuron(input, &back)
    }

    /// Deliver one lesson to a neuron, propagating backward if it opens
    pub fn train_neuron(&mut self, id: NeuronId, error: &Ensemble) -> Result<()> {
        let slot = self.neuron_slot(id)?;
        if let Some(gradient) = self.neurons[slot].accept_error(error) {
            let incoming = self.neurons[slot].inputs().to_vec();
            for synapse in incoming {
                self.learn(synapse, &gradient)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Batched entry points
    // ------------------------------------------------------------------

    fn forward(&mut self, patterns: &[Pattern]) -> Result<()> {
        let columns = patterns_to_ensembles(patterns, self.inputs.len()).map_err(|e| match e {
            NeuralError::WidthMismatch {
                index,
                expected,
                actual,
            } => TopologyError::PatternWidthMismatch {
                index,
                expected,
                actual,
            },
            other => TopologyError::Neural(other),
        })?;

        let batch = Ensemble::zeros(patterns.len());
        for bias in self.biases.clone() {
            self.run_neuron(bias, &batch)?;
        }
        for (input, column) in self.inputs.clone().into_iter().zip(&columns) {
            self.run_neuron(input, column)?;
        }
        Ok(())
    }

    fn output_states(&self) -> Vec<Ensemble> {
        self.outputs
            .iter()
            .filter_map(|id| self.neuron(*id))
            .map(|n| n.state().clone())
            .collect()
    }

    /// Evaluate a batch; returns one output pattern per input pattern
    ///
    /// # Errors
    ///
    /// `PatternWidthMismatch` when a pattern does not match the input count
    pub fn run(&mut self, patterns: &[Pattern]) -> Result<Vec<Pattern>> {
        self.forward(patterns)?;
        Ok(ensembles_to_patterns(&self.output_states()))
    }

    fn check_targets(&self, patterns: &[Pattern], targets: &[Pattern]) -> Result<Vec<Ensemble>> {
        if patterns.len() != targets.len() {
            return Err(TopologyError::TargetCountMismatch {
                patterns: patterns.len(),
                targets: targets.len(),
            });
        }
        patterns_to_ensembles(targets, self.outputs.len()).map_err(|e| match e {
            NeuralError::WidthMismatch {
                index,
                expected,
                actual,
            } => TopologyError::PatternWidthMismatch {
                index,
                expected,
                actual,
            },
            other => TopologyError::Neural(other),
        })
    }

    /// Train on a batch for `epochs` passes, error = target - output
    ///
    /// # Errors
    ///
    /// Mismatched pattern/target counts or widths
    pub fn train(
        &mut self,
        patterns: &[Pattern],
        targets: &[Pattern],
        epochs: usize,
    ) -> Result<TrainingReport> {
        let target_columns = self.check_targets(patterns, targets)?;
        let mut report = TrainingReport {
            epochs,
            mse_per_epoch: Vec::with_capacity(epochs),
        };

        for epoch in 0..epochs {
            self.forward(patterns)?;
            let outputs = self.output_states();
            report
                .mse_per_epoch
                .push(mse(&ensembles_to_patterns(&outputs), targets));

            let lessons: Vec<Ensemble> = target_columns
                .iter()
                .zip(&outputs)
                .map(|(target, output)| {
                    if target.len() == output.len() {
                        target - output
                    } else {
                        Ensemble::zeros(0)
                    }
                })
                .collect();
            self.backward(&lessons)?;
            debug!(target: "ringer-npu-network",
                "epoch {} mse {:.6}", epoch, report.mse_per_epoch[epoch]);
        }

        info!(target: "ringer-npu-network",
            "Trained {} epochs on {} patterns, mse {:?} -> {:?}",
            epochs, patterns.len(), report.first_mse(), report.last_mse());
        Ok(report)
    }

    /// One forward pass, then feed caller-supplied lessons to the outputs
    ///
    /// `lessons` holds one pattern per input pattern, one column per output.
    pub fn train_with_lessons(&mut self, patterns: &[Pattern], lessons: &[Pattern]) -> Result<()> {
        let lesson_columns = self.check_targets(patterns, lessons)?;
        self.forward(patterns)?;
        self.backward(&lesson_columns)
    }

    fn backward(&mut self, lessons: &[Ensemble]) -> Result<()> {
        for (output, lesson) in self.outputs.clone().into_iter().zip(lessons) {
            self.train_neuron(output, lesson)?;
        }
        Ok(())
    }
}
