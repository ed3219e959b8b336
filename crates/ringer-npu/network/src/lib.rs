// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ringer Network
//!
//! The neuron/synapse graph and its execution:
//! - `Neuron` with a closed set of roles (input, input without
//!   normalisation, bias, hidden, output)
//! - `Synapse` with a weight and an owned learning rule
//! - `Network`, an id-addressed arena running batched forward passes and
//!   back-propagation through fan-in/fan-out barriers
//! - `TopologyBuilder` for assembly, `dump`/`from_config` for persistence,
//!   `dot` for Graphviz output
//!
//! ## Example
//!
//! ```rust
//! use ndarray::array;
//! use ringer_npu_network::TopologyBuilder;
//!
//! let mut builder = TopologyBuilder::default();
//! let x = builder.input_no_norm().unwrap();
//! let y = builder.output().unwrap();
//! builder.synapse(x, y).unwrap();
//! let mut network = builder.build().unwrap();
//!
//! let outputs = network.run(&[array![1.0], array![-1.0]]).unwrap();
//! assert_eq!(outputs.len(), 2);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod dot;
pub mod error;
pub mod network;
pub mod neuron;
pub mod synapse;

pub use builder::TopologyBuilder;
pub use error::{Result, TopologyError};
pub use network::{Network, TrainingReport};
pub use neuron::{Neuron, NeuronRole};
pub use synapse::Synapse;
