// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines the engine configuration structs that map to sections in
//! `ringer_configuration.toml`, together with the strategy selectors shared by
//! the engine settings and the topology values.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RingerConfig {
    pub logging: LoggingConfig,
    pub network: NetworkDefaults,
    pub training: TrainingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text or json)
    pub format: LogFormat,

    /// Base directory for rolling log files (file-logging builds only)
    pub log_dir: Option<PathBuf>,

    /// Keep logs for N days
    pub retention_days: u64,

    /// Keep the N most recent runs
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            log_dir: None,
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }
}

/// Defaults applied when assembling a topology without explicit parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkDefaults {
    /// Activation used by hidden neurons
    pub hidden_activation: ActivationFunction,

    /// Activation used by output neurons
    pub output_activation: ActivationFunction,

    /// Learning rule (and its parameters) for every new synapse
    pub synapse_strategy: SynapseStrategyConfig,

    /// Initial synaptic weight
    pub initial_weight: f64,

    /// Value broadcast by bias neurons
    pub bias: f64,
}

impl Default for NetworkDefaults {
    fn default() -> Self {
        Self {
            hidden_activation: ActivationFunction::Tanh,
            output_activation: ActivationFunction::Tanh,
            synapse_strategy: SynapseStrategyConfig::default(),
            initial_weight: 0.1,
            bias: 1.0,
        }
    }
}

/// Training loop configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of passes over the pattern set per `train` call
    pub epochs: usize,

    /// Whether synapses adapt their weights at all
    pub learning: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            learning: true,
        }
    }
}

/// Activation function owned by hidden and output neurons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationFunction {
    /// Hyperbolic tangent
    Tanh,
    /// Logistic function 1 / (1 + e^-x)
    Sigmoid,
    /// Identity (y = x)
    Linear,
}

impl ActivationFunction {
    pub fn name(self) -> &'static str {
        match self {
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Linear => "linear",
        }
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tanh" => Ok(ActivationFunction::Tanh),
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "linear" => Ok(ActivationFunction::Linear),
            other => Err(ConfigError::UnknownStrategy {
                kind: "activation",
                name: other.to_string(),
            }),
        }
    }
}

/// Learning rule selector for synapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum SynapseStrategyKind {
    /// Back-propagation with momentum and adaptive learning rate
    #[serde(rename = "backprop")]
    BackProp,
    /// Resilient back-propagation (Riedmiller & Braun)
    #[serde(rename = "rprop")]
    RProp,
}

impl SynapseStrategyKind {
    pub fn name(self) -> &'static str {
        match self {
            SynapseStrategyKind::BackProp => "backprop",
            SynapseStrategyKind::RProp => "rprop",
        }
    }
}

impl fmt::Display for SynapseStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SynapseStrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backprop" | "back-propagation" | "backpropagation" => {
                Ok(SynapseStrategyKind::BackProp)
            }
            "rprop" | "resilient" | "resilient-propagation" => Ok(SynapseStrategyKind::RProp),
            other => Err(ConfigError::UnknownStrategy {
                kind: "synapse",
                name: other.to_string(),
            }),
        }
    }
}

/// Published Riedmiller-Braun step growth factor
pub const RPROP_INCREASE: f64 = 1.2;
/// Published Riedmiller-Braun step shrink factor
pub const RPROP_DECREASE: f64 = 0.5;
/// Smallest step RProp may shrink to
pub const RPROP_MIN_STEP: f64 = 1e-6;
/// Largest step RProp may grow to
pub const RPROP_MAX_STEP: f64 = 50.0;
/// Usual start-up step
pub const RPROP_INITIAL_STEP: f64 = 0.1;

/// Learning rule parameters for one synapse
///
/// Besides the tunable parameters this carries the rule's adaptation state, so
/// a dumped synapse reloads into exactly the learner it was.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "strategy")]
pub enum SynapseStrategyConfig {
    #[serde(rename = "backprop")]
    BackProp {
        learning_rate: f64,
        momentum: f64,
        decay: f64,
        #[serde(default)]
        previous_delta: f64,
    },
    #[serde(rename = "rprop")]
    RProp {
        weight_update: f64,
        #[serde(default = "default_rprop_increase")]
        increase: f64,
        #[serde(default = "default_rprop_decrease")]
        decrease: f64,
        #[serde(default = "default_rprop_min_step")]
        min_step: f64,
        #[serde(default = "default_rprop_max_step")]
        max_step: f64,
        #[serde(default)]
        previous_delta: f64,
        #[serde(default)]
        previous_derivative: f64,
    },
}

fn default_rprop_increase() -> f64 {
    RPROP_INCREASE
}

fn default_rprop_decrease() -> f64 {
    RPROP_DECREASE
}

fn default_rprop_min_step() -> f64 {
    RPROP_MIN_STEP
}

fn default_rprop_max_step() -> f64 {
    RPROP_MAX_STEP
}

impl SynapseStrategyConfig {
    /// Back-propagation parameters with a fresh history
    pub fn backprop(learning_rate: f64, momentum: f64, decay: f64) -> Self {
        SynapseStrategyConfig::BackProp {
            learning_rate,
            momentum,
            decay,
            previous_delta: 0.0,
        }
    }

    /// RProp with the published factors and bounds
    pub fn rprop(weight_update: f64) -> Self {
        SynapseStrategyConfig::RProp {
            weight_update,
            increase: RPROP_INCREASE,
            decrease: RPROP_DECREASE,
            min_step: RPROP_MIN_STEP,
            max_step: RPROP_MAX_STEP,
            previous_delta: 0.0,
            previous_derivative: 0.0,
        }
    }

    /// Default parameters for a given rule
    pub fn default_for(kind: SynapseStrategyKind) -> Self {
        match kind {
            SynapseStrategyKind::BackProp => Self::backprop(0.1, 0.1, 0.9),
            SynapseStrategyKind::RProp => Self::rprop(RPROP_INITIAL_STEP),
        }
    }

    pub fn kind(&self) -> SynapseStrategyKind {
        match self {
            SynapseStrategyConfig::BackProp { .. } => SynapseStrategyKind::BackProp,
            SynapseStrategyConfig::RProp { .. } => SynapseStrategyKind::RProp,
        }
    }
}

impl Default for SynapseStrategyConfig {
    fn default() -> Self {
        Self::rprop(RPROP_INITIAL_STEP)
    }
}
