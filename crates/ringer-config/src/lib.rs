// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Ringer Configuration System
//!
//! Type-safe configuration for the ringer neural engine:
//! - TOML file parsing (`ringer_configuration.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//! - Topology values (`NetworkConfig`, `NeuronConfig`, `SynapseConfig`) that
//!   networks produce through `dump()` and are rebuilt from
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ringer_config::load_config;
//!
//! let config = load_config(None, None).expect("Failed to load config");
//! println!("Epochs: {}", config.training.epochs);
//! println!("Hidden activation: {}", config.network.hidden_activation);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod topology;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use topology::*;
pub use types::*;
pub use validation::{
    validate_config, validate_network_config, validate_synapse_strategy, ConfigValidationError,
};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Unknown {kind} strategy: {name}")]
    UnknownStrategy { kind: &'static str, name: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
