// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Core type definitions shared by the plasticity and network crates.

pub mod ensemble;
pub mod error;
pub mod id_manager;
pub mod ids;

pub use ensemble::{ensembles_to_patterns, mean, mse, patterns_to_ensembles, Ensemble, Pattern};
pub use error::{NeuralError, Result};
pub use id_manager::IdAllocator;
pub use ids::{NeuronId, SynapseId};
