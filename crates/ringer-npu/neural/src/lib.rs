// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ringer Neural Primitives
//!
//! Building blocks shared by every layer of the engine:
//! - Neuron and synapse identifiers plus a per-network allocator
//! - `Ensemble`/`Pattern` vectors and the transposes between them
//! - Activation strategies (tanh, sigmoid, linear)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activation;
pub mod types;

pub use activation::ActivationStrategy;
pub use types::*;

pub use ringer_config::ActivationFunction;
