// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ringer Plasticity Module
//!
//! Weight update rules owned by synapses:
//! - Back-propagation with momentum and a self-adjusting learning rate
//! - RProp (resilient propagation), sign-based with adaptive step sizes
//!
//! Every rule turns the presynaptic ensemble and the postsynaptic lesson into
//! one scalar weight change per training step, and can dump its parameters
//! together with its adaptation history.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backprop;
pub mod rprop;
pub mod strategy;

pub use backprop::SynapseBackProp;
pub use rprop::SynapseRProp;
pub use strategy::{WeightUpdate, WeightUpdateStrategy};

use ringer_npu_neural::Ensemble;

/// Mean of `input ⊙ lesson`
///
/// Only the overlapping prefix takes part when the widths differ; an empty
/// overlap yields 0.
pub fn mean_product(input: &Ensemble, lesson: &Ensemble) -> f64 {
    let count = input.len().min(lesson.len());
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = input
        .iter()
        .zip(lesson.iter())
        .map(|(x, e)| x * e)
        .sum();
    sum / count as f64
}
