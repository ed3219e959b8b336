// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for topology assembly and network execution

use ringer_config::ConfigError;
use ringer_npu_neural::{NeuralError, NeuronId, SynapseId};

/// Errors raised at the boundary between network assembly and the graph
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("{0} not found")]
    NeuronNotFound(NeuronId),

    #[error("{0} not found")]
    SynapseNotFound(SynapseId),

    #[error("Duplicate neuron id {0}")]
    DuplicateNeuronId(u32),

    #[error("Duplicate synapse id {0}")]
    DuplicateSynapseId(u32),

    #[error("{neuron} still has {incoming} incoming and {outgoing} outgoing synapses")]
    NeuronStillConnected {
        neuron: NeuronId,
        incoming: usize,
        outgoing: usize,
    },

    #[error("{synapse} is already connected ({input:?} -> {output:?})")]
    SynapseAlreadyConnected {
        synapse: SynapseId,
        input: Option<NeuronId>,
        output: Option<NeuronId>,
    },

    #[error("Pattern {index} has width {actual}, network expects {expected}")]
    PatternWidthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{patterns} patterns but {targets} targets")]
    TargetCountMismatch { patterns: usize, targets: usize },

    #[error("Invalid topology: {0}")]
    Invalid(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Neural(#[from] NeuralError),
}

pub type Result<T> = core::result::Result<T, TopologyError>;
