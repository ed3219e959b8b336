// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identifier allocation for topology construction
//!
//! Each network owns its allocator, so independently built networks never
//! share counters and tests can start from a known state.

use super::error::{NeuralError, Result};
use super::ids::{NeuronId, SynapseId};

/// Monotonic neuron and synapse identifier source
///
/// Cursors are kept one bit wider than the ids, so pinning `u32::MAX` is
/// legal and only the following allocation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next_neuron: u64,
    next_synapse: u64,
}

fn take(cursor: &mut u64, kind: &'static str) -> Result<u32> {
    let id = u32::try_from(*cursor).map_err(|_| NeuralError::IdsExhausted(kind))?;
    *cursor += 1;
    Ok(id)
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next free neuron id
    ///
    /// # Errors
    ///
    /// `IdsExhausted` once `u32::MAX` has been handed out or pinned
    pub fn next_neuron(&mut self) -> Result<NeuronId> {
        take(&mut self.next_neuron, "neuron").map(NeuronId)
    }

    /// Hand out the next free synapse id
    pub fn next_synapse(&mut self) -> Result<SynapseId> {
        take(&mut self.next_synapse, "synapse").map(SynapseId)
    }

    /// Claim an explicit neuron id; later allocations continue past it
    pub fn pin_neuron(&mut self, id: u32) -> NeuronId {
        self.next_neuron = self.next_neuron.max(u64::from(id) + 1);
        NeuronId(id)
    }

    /// Claim an explicit synapse id; later allocations continue past it
    pub fn pin_synapse(&mut self, id: u32) -> SynapseId {
        self.next_synapse = self.next_synapse.max(u64::from(id) + 1);
        SynapseId(id)
    }

    /// Id the next `next_neuron` call returns, `None` when exhausted
    pub fn peek_neuron(&self) -> Option<NeuronId> {
        u32::try_from(self.next_neuron).ok().map(NeuronId)
    }

    pub fn peek_synapse(&self) -> Option<SynapseId> {
        u32::try_from(self.next_synapse).ok().map(SynapseId)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
