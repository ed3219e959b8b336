// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks that configuration values are within valid ranges and that a
//! topology description is internally consistent. Every violation is
//! collected before reporting.

use std::collections::HashSet;

use crate::{
    ConfigError, ConfigResult, NetworkConfig, NeuronRoleConfig, RingerConfig,
    SynapseStrategyConfig,
};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    OutOfRange { field: String, value: f64, range: &'static str },
    DuplicateId { kind: &'static str, id: u32 },
    DanglingReference { synapse: u32, neuron: u32 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { field, value, range } => {
                write!(f, "{} = {} is outside valid range {}", field, value, range)
            }
            Self::DuplicateId { kind, id } => write!(f, "Duplicate {} id {}", kind, id),
            Self::DanglingReference { synapse, neuron } => write!(
                f,
                "Synapse {} references neuron {} which does not exist",
                synapse, neuron
            ),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

fn into_result(errors: Vec<ConfigValidationError>, what: &str) -> ConfigResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "{} validation failed:\n{}",
        what, error_messages
    )))
}

/// Validate the engine configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &RingerConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_synapse_strategy(
        "network.synapse_strategy",
        &config.network.synapse_strategy,
        &mut errors,
    );

    if !config.network.initial_weight.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "network.initial_weight".to_string(),
            reason: "must be finite".to_string(),
        });
    }
    if !config.network.bias.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "network.bias".to_string(),
            reason: "must be finite".to_string(),
        });
    }
    if config.training.epochs == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "training.epochs".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let level = config.logging.level.to_lowercase();
    if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("unknown level '{}'", config.logging.level),
        });
    }

    into_result(errors, "Configuration")
}

/// Validate the parameters of one learning rule
pub fn validate_synapse_strategy(
    field: &str,
    strategy: &SynapseStrategyConfig,
    errors: &mut Vec<ConfigValidationError>,
) {
    match *strategy {
        SynapseStrategyConfig::BackProp {
            learning_rate,
            momentum,
            decay,
            ..
        } => {
            if !(learning_rate > 0.0 && learning_rate.is_finite()) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.learning_rate", field),
                    value: learning_rate,
                    range: "(0, inf)",
                });
            }
            if !(0.0..1.0).contains(&momentum) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.momentum", field),
                    value: momentum,
                    range: "[0, 1)",
                });
            }
            if !(decay > 0.0 && decay <= 1.0) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.decay", field),
                    value: decay,
                    range: "(0, 1]",
                });
            }
        }
        SynapseStrategyConfig::RProp {
            weight_update,
            increase,
            decrease,
            min_step,
            max_step,
            ..
        } => {
            if !(min_step > 0.0 && min_step < max_step && max_step.is_finite()) {
                errors.push(ConfigValidationError::InvalidValue {
                    field: format!("{}.min_step/max_step", field),
                    reason: format!(
                        "need 0 < min_step < max_step, got [{}, {}]",
                        min_step, max_step
                    ),
                });
            }
            if !(weight_update > 0.0 && weight_update.is_finite()) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.weight_update", field),
                    value: weight_update,
                    range: "(0, inf)",
                });
            }
            if !(increase > 1.0 && increase.is_finite()) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.increase", field),
                    value: increase,
                    range: "(1, inf)",
                });
            }
            if !(decrease > 0.0 && decrease < 1.0) {
                errors.push(ConfigValidationError::OutOfRange {
                    field: format!("{}.decrease", field),
                    value: decrease,
                    range: "(0, 1)",
                });
            }
        }
    }
}

/// Validate a topology description
///
/// Checks for duplicate identifiers, synapses pointing at unknown neurons,
/// zero input divisors, and learning rule parameters.
pub fn validate_network_config(config: &NetworkConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    let mut neuron_ids = HashSet::new();
    for neuron in &config.neurons {
        if !neuron_ids.insert(neuron.id) {
            errors.push(ConfigValidationError::DuplicateId {
                kind: "neuron",
                id: neuron.id,
            });
        }
        match neuron.role {
            NeuronRoleConfig::Input { subtract, divide } => {
                if divide == 0.0 || !divide.is_finite() || !subtract.is_finite() {
                    errors.push(ConfigValidationError::InvalidValue {
                        field: format!("neuron[{}].divide", neuron.id),
                        reason: format!(
                            "normalisation (x - {}) / {} is not usable",
                            subtract, divide
                        ),
                    });
                }
            }
            NeuronRoleConfig::Bias { bias } if !bias.is_finite() => {
                errors.push(ConfigValidationError::InvalidValue {
                    field: format!("neuron[{}].bias", neuron.id),
                    reason: "must be finite".to_string(),
                });
            }
            _ => {}
        }
    }

    let mut synapse_ids = HashSet::new();
    for synapse in &config.synapses {
        if !synapse_ids.insert(synapse.id) {
            errors.push(ConfigValidationError::DuplicateId {
                kind: "synapse",
                id: synapse.id,
            });
        }
        for end in [synapse.input, synapse.output].into_iter().flatten() {
            if !neuron_ids.contains(&end) {
                errors.push(ConfigValidationError::DanglingReference {
                    synapse: synapse.id,
                    neuron: end,
                });
            }
        }
        validate_synapse_strategy(
            &format!("synapse[{}].strategy", synapse.id),
            &synapse.strategy,
            &mut errors,
        );
    }

    into_result(errors, "Network configuration")
}
