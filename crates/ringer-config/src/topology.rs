// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Topology configuration values
//!
//! A `NetworkConfig` describes every neuron and synapse of a network, including
//! adapted weights and learning state. Networks produce one through `dump()`
//! and can be rebuilt from one with every identifier pinned.

use serde::{Deserialize, Serialize};

use crate::types::{ActivationFunction, SynapseStrategyConfig};

/// Descriptive header attached to a dumped network
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Header {
    pub author: String,
    pub name: String,
    pub version: String,
    /// Creation time, seconds since the Unix epoch
    pub created: u64,
    pub comment: String,
}

/// One neuron: its identifier and role-specific parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NeuronConfig {
    pub id: u32,
    pub role: NeuronRoleConfig,
}

/// Role of a neuron in the graph
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeuronRoleConfig {
    /// Normalising input: forwards `(x - subtract) / divide`
    Input { subtract: f64, divide: f64 },
    /// Input forwarding its data untouched
    InputNoNorm,
    /// Constant source, ignores the data it is handed
    Bias { bias: f64 },
    Hidden { activation: ActivationFunction },
    Output { activation: ActivationFunction },
}

impl NeuronRoleConfig {
    pub fn name(&self) -> &'static str {
        match self {
            NeuronRoleConfig::Input { .. } => "input",
            NeuronRoleConfig::InputNoNorm => "input_no_norm",
            NeuronRoleConfig::Bias { .. } => "bias",
            NeuronRoleConfig::Hidden { .. } => "hidden",
            NeuronRoleConfig::Output { .. } => "output",
        }
    }
}

fn default_learning() -> bool {
    true
}

/// One synapse: endpoints, weight and learning rule state
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SynapseConfig {
    pub id: u32,
    #[serde(default)]
    pub input: Option<u32>,
    #[serde(default)]
    pub output: Option<u32>,
    pub weight: f64,
    #[serde(default = "default_learning")]
    pub learning: bool,
    pub strategy: SynapseStrategyConfig,
}

/// Complete network description
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub header: Option<Header>,
    pub neurons: Vec<NeuronConfig>,
    pub synapses: Vec<SynapseConfig>,
}

impl NetworkConfig {
    pub fn neuron(&self, id: u32) -> Option<&NeuronConfig> {
        self.neurons.iter().find(|n| n.id == id)
    }

    pub fn synapse(&self, id: u32) -> Option<&SynapseConfig> {
        self.synapses.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NetworkConfig {
        NetworkConfig {
            header: Some(Header {
                author: "ringer".to_string(),
                name: "xor".to_string(),
                version: "1.0".to_string(),
                created: 1_700_000_000,
                comment: "Start set".to_string(),
            }),
            neurons: vec![
                NeuronConfig {
                    id: 0,
                    role: NeuronRoleConfig::Input {
                        subtract: 0.5,
                        divide: 2.0,
                    },
                },
                NeuronConfig {
                    id: 1,
                    role: NeuronRoleConfig::Output {
                        activation: ActivationFunction::Linear,
                    },
                },
            ],
            synapses: vec![SynapseConfig {
                id: 7,
                input: Some(0),
                output: Some(1),
                weight: -0.25,
                learning: true,
                strategy: SynapseStrategyConfig::backprop(0.1, 0.2, 0.95),
            }],
        }
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["neurons"][0]["role"]["kind"], "input");
        assert_eq!(json["neurons"][1]["role"]["activation"], "linear");
        assert_eq!(json["synapses"][0]["strategy"]["strategy"], "backprop");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = sample();
        let text = toml::to_string(&config).unwrap();
        let back: NetworkConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_learning_defaults_to_true() {
        let synapse: SynapseConfig = serde_json::from_str(
            r#"{"id": 3, "weight": 0.5, "strategy": {"strategy": "rprop", "weight_update": 0.1}}"#,
        )
        .unwrap();
        assert!(synapse.learning);
        assert_eq!(synapse.input, None);
    }

    #[test]
    fn test_lookup() {
        let config = sample();
        assert_eq!(config.neuron(1).map(|n| n.role.name()), Some("output"));
        assert!(config.synapse(7).is_some());
        assert!(config.synapse(8).is_none());
    }
}
