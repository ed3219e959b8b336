// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file -> builder -> trained network -> persisted topology

use std::io::Write;

use ringer::prelude::*;

const CONFIG: &str = r#"
[logging]
level = "warn"

[network]
hidden_activation = "sigmoid"
output_activation = "linear"
initial_weight = 0.25
bias = 1.0

[network.synapse_strategy]
strategy = "backprop"
learning_rate = 0.3
momentum = 0.2
decay = 0.9

[training]
epochs = 25
learning = true
"#;

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("ringer.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

fn build(config: &RingerConfig) -> Network {
    let mut builder = TopologyBuilder::from_config(config);
    let x = builder.input(1.0, 2.0).unwrap();
    let bias = builder.bias().unwrap();
    let h = builder.hidden().unwrap();
    let y = builder.output().unwrap();
    builder.synapse(x, h).unwrap();
    builder.synapse(bias, h).unwrap();
    builder.synapse(h, y).unwrap();
    builder.synapse(bias, y).unwrap();
    builder.build().unwrap()
}

#[test]
fn test_config_file_drives_topology() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, CONFIG);
    let config = load_config(Some(&path), None).unwrap();
    assert_eq!(config.training.epochs, 25);

    let network = build(&config);
    assert_eq!(network.inputs().len(), 1);
    assert_eq!(network.biases().len(), 1);
    assert_eq!(network.outputs().len(), 1);
    for synapse in network.synapses() {
        assert_eq!(synapse.weight(), 0.25);
        assert_eq!(WeightUpdate::kind(synapse.strategy()), SynapseStrategyKind::BackProp);
    }
}

#[test]
fn test_trained_dump_serializes_strategy_state() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(Some(&write_config(&dir, CONFIG)), None).unwrap();
    let mut network = build(&config);

    let patterns = [array![0.0], array![2.0], array![4.0]];
    let targets = [array![0.0], array![0.5], array![1.0]];
    let report = network
        .train(&patterns, &targets, config.training.epochs)
        .unwrap();
    assert_eq!(report.mse_per_epoch.len(), 25);
    assert!(report.last_mse().unwrap() < report.first_mse().unwrap());

    let dumped = network.dump(Some(Header {
        author: "ringer".to_string(),
        name: "config-driven".to_string(),
        ..Header::default()
    }));
    let json = serde_json::to_value(&dumped).unwrap();
    assert_eq!(json["header"]["name"], "config-driven");
    assert_eq!(json["neurons"][0]["role"]["kind"], "input");
    assert_eq!(json["neurons"][0]["role"]["divide"], 2.0);
    assert_eq!(json["neurons"][2]["role"]["activation"], "sigmoid");
    for synapse in json["synapses"].as_array().unwrap() {
        assert_eq!(synapse["strategy"]["strategy"], "backprop");
        assert!(synapse["strategy"]["previous_delta"].as_f64().unwrap() != 0.0);
    }

    // reload through toml, then both copies keep learning in lockstep
    let text = toml::to_string(&dumped).unwrap();
    let mut reloaded = Network::from_config(&toml::from_str(&text).unwrap()).unwrap();
    network.train(&patterns, &targets, 5).unwrap();
    reloaded.train(&patterns, &targets, 5).unwrap();
    assert_eq!(network.dump(None), reloaded.dump(None));
}

#[test]
fn test_invalid_strategy_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let broken = CONFIG.replace("strategy = \"backprop\"", "strategy = \"hebbian\"");
    let path = write_config(&dir, &broken);
    assert!(load_config(Some(&path), None).is_err());
}

#[test]
fn test_learning_disabled_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let frozen = CONFIG.replace("learning = true", "learning = false");
    let config = load_config(Some(&write_config(&dir, &frozen)), None).unwrap();
    let mut network = build(&config);
    let before = network.dump(None);

    network.train(&[array![2.0]], &[array![1.0]], 3).unwrap();
    let after = network.dump(None);
    for (a, b) in before.synapses.iter().zip(&after.synapses) {
        assert_eq!(a.weight, b.weight);
        assert_eq!(a.strategy, b.strategy);
    }
}
