// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ringer - feed-forward neural network engine
//!
//! A neuron/synapse graph trained with momentum back-propagation or RProp,
//! evaluated on batches of feature patterns.
//!
//! ## Crates
//!
//! - **`config`**: engine settings (`ringer_configuration.toml`, env and CLI
//!   overrides) and the topology values networks dump and reload
//! - **`neural`**: ids, `Ensemble`/`Pattern`, activation strategies
//! - **`plasticity`**: weight update rules
//! - **`network`**: neurons, synapses, the network arena, topology builder
//! - **`observability`** (feature `observability`, default): logging bootstrap
//!
//! ## Usage
//!
//! ```rust
//! use ringer::prelude::*;
//!
//! let mut builder = TopologyBuilder::new(NetworkDefaults::default());
//! let x = builder.input(0.0, 1.0)?;
//! let bias = builder.bias()?;
//! let h = builder.hidden()?;
//! let y = builder.output_with(ActivationFunction::Linear)?;
//! builder.synapse(x, h)?;
//! builder.synapse(bias, h)?;
//! builder.synapse(h, y)?;
//! let mut network = builder.build()?;
//!
//! let patterns = [array![1.0], array![-1.0]];
//! let targets = [array![0.5], array![-0.5]];
//! let report = network.train(&patterns, &targets, 50)?;
//! assert!(report.last_mse() < report.first_mse());
//! # Ok::<(), TopologyError>(())
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use ringer_config as config;
pub use ringer_npu_network as network;
pub use ringer_npu_neural as neural;
pub use ringer_npu_plasticity as plasticity;

#[cfg(feature = "observability")]
pub use ringer_observability as observability;

pub use ndarray;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{
        load_config, ActivationFunction, Header, NetworkConfig, NetworkDefaults, RingerConfig,
        SynapseStrategyConfig, SynapseStrategyKind,
    };
    pub use crate::network::{
        Network, Neuron, NeuronRole, Synapse, TopologyBuilder, TopologyError, TrainingReport,
    };
    pub use crate::neural::{mse, ActivationStrategy, Ensemble, NeuronId, Pattern, SynapseId};
    pub use crate::plasticity::{WeightUpdate, WeightUpdateStrategy};
    pub use ndarray::array;
}
