// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neurons and their roles
//!
//! A neuron knows only the identifiers of the synapses attached to it. The
//! methods here perform the local half of each pass: accumulating
//! contributions, deciding whether the fan-in or fan-out barrier has opened,
//! and producing the ensemble that the network then hands to the adjacent
//! synapses.
//!
//! | role           | forward                          | backward                   |
//! |----------------|----------------------------------|----------------------------|
//! | input          | `(x - subtract) / divide`        | ignored                    |
//! | input_no_norm  | `x`                              | ignored                    |
//! | bias           | constant, data ignored           | ignored                    |
//! | hidden         | fan-in barrier, then activation  | fan-out barrier, gradient  |
//! | output         | fan-in barrier, then activation  | gradient on every call     |

use ringer_config::{NeuronConfig, NeuronRoleConfig};
use ringer_npu_neural::{ActivationStrategy, Ensemble, NeuronId, SynapseId};
use tracing::{debug, trace, warn};

use crate::error::{Result, TopologyError};

/// Role of a neuron, with its role-specific parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NeuronRole {
    Input { subtract: f64, divide: f64 },
    InputNoNorm,
    Bias { bias: f64 },
    Hidden { activation: ActivationStrategy },
    Output { activation: ActivationStrategy },
}

impl NeuronRole {
    /// Normalising input role
    ///
    /// # Errors
    ///
    /// `Invalid` when `divide` is zero or either parameter is not finite
    pub fn input(subtract: f64, divide: f64) -> Result<Self> {
        if divide == 0.0 || !divide.is_finite() || !subtract.is_finite() {
            return Err(TopologyError::Invalid(format!(
                "input normalisation (x - {}) / {} is not usable",
                subtract, divide
            )));
        }
        Ok(NeuronRole::Input { subtract, divide })
    }

    pub fn from_config(config: &NeuronRoleConfig) -> Result<Self> {
        Ok(match *config {
            NeuronRoleConfig::Input { subtract, divide } => Self::input(subtract, divide)?,
            NeuronRoleConfig::InputNoNorm => NeuronRole::InputNoNorm,
            NeuronRoleConfig::Bias { bias } => NeuronRole::Bias { bias },
            NeuronRoleConfig::Hidden { activation } => NeuronRole::Hidden {
                activation: ActivationStrategy::new(activation),
            },
            NeuronRoleConfig::Output { activation } => NeuronRole::Output {
                activation: ActivationStrategy::new(activation),
            },
        })
    }

    pub fn dump(&self) -> NeuronRoleConfig {
        match *self {
            NeuronRole::Input { subtract, divide } => NeuronRoleConfig::Input { subtract, divide },
            NeuronRole::InputNoNorm => NeuronRoleConfig::InputNoNorm,
            NeuronRole::Bias { bias } => NeuronRoleConfig::Bias { bias },
            NeuronRole::Hidden { activation } => NeuronRoleConfig::Hidden {
                activation: activation.dump(),
            },
            NeuronRole::Output { activation } => NeuronRoleConfig::Output {
                activation: activation.dump(),
            },
        }
    }

    /// Input, input-without-normalisation or bias
    pub fn is_input_family(&self) -> bool {
        matches!(
            self,
            NeuronRole::Input { .. } | NeuronRole::InputNoNorm | NeuronRole::Bias { .. }
        )
    }

    /// Whether the role reads a column of the pattern batch
    pub fn takes_pattern_data(&self) -> bool {
        matches!(self, NeuronRole::Input { .. } | NeuronRole::InputNoNorm)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, NeuronRole::Output { .. })
    }

    pub fn accepts_incoming(&self) -> bool {
        !self.is_input_family()
    }

    pub fn accepts_outgoing(&self) -> bool {
        !self.is_output()
    }

    pub fn activation(&self) -> Option<&ActivationStrategy> {
        match self {
            NeuronRole::Hidden { activation } | NeuronRole::Output { activation } => {
                Some(activation)
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.dump().name()
    }
}

/// One node of the graph
#[derive(Debug, Clone)]
pub struct Neuron {
    id: NeuronId,
    role: NeuronRole,
    inputs: Vec<SynapseId>,
    outputs: Vec<SynapseId>,
    /// Last activation on the forward pass, last local gradient on the backward pass
    state: Ensemble,
    /// Error accumulated from outgoing synapses (hidden only)
    error: Ensemble,
    pending_runs: usize,
    pending_lessons: usize,
}

impl Neuron {
    pub fn new(id: NeuronId, role: NeuronRole) -> Self {
        Self {
            id,
            role,
            inputs: Vec::new(),
            outputs: Vec::new(),
            state: Ensemble::zeros(0),
            error: Ensemble::zeros(0),
            pending_runs: 0,
            pending_lessons: 0,
        }
    }

    pub fn from_config(config: &NeuronConfig) -> Result<Self> {
        Ok(Self::new(
            NeuronId(config.id),
            NeuronRole::from_config(&config.role)?,
        ))
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn role(&self) -> &NeuronRole {
        &self.role
    }

    pub fn state(&self) -> &Ensemble {
        &self.state
    }

    pub fn inputs(&self) -> &[SynapseId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[SynapseId] {
        &self.outputs
    }

    pub fn fan_in(&self) -> usize {
        self.inputs.len()
    }

    pub fn fan_out(&self) -> usize {
        self.outputs.len()
    }

    /// Contributions received in the current forward pass
    pub fn pending_runs(&self) -> usize {
        self.pending_runs
    }

    /// Lessons received in the current backward pass
    pub fn pending_lessons(&self) -> usize {
        self.pending_lessons
    }

    pub fn is_connected(&self) -> bool {
        !self.inputs.is_empty() || !self.outputs.is_empty()
    }

    /// Attach an incoming synapse; returns whether anything changed
    pub fn in_connect(&mut self, synapse: SynapseId) -> bool {
        if !self.role.accepts_incoming() {
            warn!(target: "ringer-npu-network",
                "{} ({}) cannot take incoming {}, ignored", self.id, self.role.name(), synapse);
            return false;
        }
        if self.inputs.contains(&synapse) {
            warn!(target: "ringer-npu-network",
                "{} already receives from {}, ignored", self.id, synapse);
            return false;
        }
        self.inputs.push(synapse);
        true
    }

    /// Attach an outgoing synapse; returns whether anything changed
    pub fn out_connect(&mut self, synapse: SynapseId) -> bool {
        if !self.role.accepts_outgoing() {
            warn!(target: "ringer-npu-network",
                "{} ({}) cannot take outgoing {}, ignored", self.id, self.role.name(), synapse);
            return false;
        }
        if self.outputs.contains(&synapse) {
            warn!(target: "ringer-npu-network",
                "{} already feeds {}, ignored", self.id, synapse);
            return false;
        }
        self.outputs.push(synapse);
        true
    }

    pub fn in_disconnect(&mut self, synapse: SynapseId) -> bool {
        if !self.role.accepts_incoming() {
            warn!(target: "ringer-npu-network",
                "{} ({}) has no incoming synapses, ignored", self.id, self.role.name());
            return false;
        }
        match self.inputs.iter().position(|s| *s == synapse) {
            Some(position) => {
                self.inputs.remove(position);
                self.pending_runs = 0;
                true
            }
            None => {
                warn!(target: "ringer-npu-network",
                    "{} is not an input of {}, ignored", synapse, self.id);
                false
            }
        }
    }

    pub fn out_disconnect(&mut self, synapse: SynapseId) -> bool {
        if !self.role.accepts_outgoing() {
            warn!(target: "ringer-npu-network",
                "{} ({}) has no outgoing synapses, ignored", self.id, self.role.name());
            return false;
        }
        match self.outputs.iter().position(|s| *s == synapse) {
            Some(position) => {
                self.outputs.remove(position);
                self.pending_lessons = 0;
                true
            }
            None => {
                warn!(target: "ringer-npu-network",
                    "{} is not an output of {}, ignored", synapse, self.id);
                false
            }
        }
    }

    /// Forward step for one contribution
    ///
    /// Returns the ensemble to hand to every outgoing synapse once the neuron
    /// fires, `None` while the fan-in barrier is still closed.
    pub fn accept(&mut self, data: &Ensemble) -> Option<Ensemble> {
        match self.role {
            NeuronRole::Input { subtract, divide } => {
                self.state = data.mapv(|x| (x - subtract) / divide);
                Some(self.state.clone())
            }
            NeuronRole::InputNoNorm => {
                self.state = data.clone();
                Some(self.state.clone())
            }
            NeuronRole::Bias { bias } => {
                self.state = Ensemble::from_elem(data.len(), bias);
                Some(self.state.clone())
            }
            NeuronRole::Hidden { activation } | NeuronRole::Output { activation } => {
                if data.len() != self.state.len() {
                    trace!(target: "ringer-npu-network",
                        "{} resizing state {} -> {}", self.id, self.state.len(), data.len());
                    self.state = Ensemble::zeros(data.len());
                    self.pending_runs = 0;
                } else if self.pending_runs == 0 {
                    self.state.fill(0.0);
                }
                self.state += data;
                self.pending_runs += 1;

                if self.pending_runs < self.fan_in().max(1) {
                    return None;
                }
                self.pending_runs = 0;
                activation.run(&mut self.state);
                debug!(target: "ringer-npu-network", "{} fired forward", self.id);
                Some(self.state.clone())
            }
        }
    }

    /// Backward step for one lesson
    ///
    /// Returns the local gradient to hand to every incoming synapse once the
    /// neuron is ready, `None` while waiting (hidden fan-out barrier) or for
    /// roles that do not learn.
    pub fn accept_error(&mut self, error: &Ensemble) -> Option<Ensemble> {
        match self.role {
            NeuronRole::Input { .. } | NeuronRole::InputNoNorm | NeuronRole::Bias { .. } => None,
            NeuronRole::Output { activation } => self.gradient(&activation, error),
            NeuronRole::Hidden { activation } => {
                if error.len() != self.error.len() {
                    trace!(target: "ringer-npu-network",
                        "{} resizing error {} -> {}", self.id, self.error.len(), error.len());
                    self.error = Ensemble::zeros(error.len());
                    self.pending_lessons = 0;
                } else if self.pending_lessons == 0 {
                    self.error.fill(0.0);
                }
                self.error += error;
                self.pending_lessons += 1;

                if self.pending_lessons < self.fan_out().max(1) {
                    return None;
                }
                self.pending_lessons = 0;
                let accumulated = std::mem::replace(&mut self.error, Ensemble::zeros(0));
                let gradient = self.gradient(&activation, &accumulated);
                self.error = accumulated;
                gradient
            }
        }
    }

    fn gradient(&mut self, activation: &ActivationStrategy, error: &Ensemble) -> Option<Ensemble> {
        match activation.teach(&mut self.state, error) {
            Ok(()) => {
                debug!(target: "ringer-npu-network", "{} fired backward", self.id);
                Some(self.state.clone())
            }
            Err(e) => {
                warn!(target: "ringer-npu-network", "{} cannot learn: {}", self.id, e);
                None
            }
        }
    }

    pub fn dump(&self) -> NeuronConfig {
        NeuronConfig {
            id: self.id.0,
            role: self.role.dump(),
        }
    }

    /// Graphviz node statement
    pub fn dot(&self) -> String {
        let id = self.id.0;
        match &self.role {
            NeuronRole::Input { subtract, divide } => format!(
                "{} [shape=box, label=\"{} | (x - {}) / {}\"] ;",
                id, id, subtract, divide
            ),
            NeuronRole::InputNoNorm => format!("{} [shape=box, label=\"{} | x\"] ;", id, id),
            NeuronRole::Bias { bias } => {
                format!("{} [shape=box, label=\"{} | bias {}\"] ;", id, id, bias)
            }
            NeuronRole::Hidden { activation } | NeuronRole::Output { activation } => format!(
                "{} [shape=Mrecord, label=\"{{{{{} | <input> (+)}} | <output> {} }}\"] ;",
                id,
                id,
                activation.dot()
            ),
        }
    }
}
