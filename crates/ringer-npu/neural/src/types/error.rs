// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural computation

use ringer_config::ConfigError;

/// Errors raised by the neural primitives
#[derive(Debug, thiserror::Error)]
pub enum NeuralError {
    #[error("Width mismatch at item {index}: expected {expected}, got {actual}")]
    WidthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("No {0} identifiers left")]
    IdsExhausted(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = core::result::Result<T, NeuralError>;
