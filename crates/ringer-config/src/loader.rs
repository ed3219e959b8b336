// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::validation::validate_config;
use crate::{
    ActivationFunction, ConfigError, ConfigResult, LogFormat, RingerConfig, SynapseStrategyConfig,
    SynapseStrategyKind,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for on disk
pub const CONFIG_FILE_NAME: &str = "ringer_configuration.toml";

/// Find the ringer configuration file
///
/// Search order:
/// 1. `RINGER_CONFIG_PATH` environment variable
/// 2. Current working directory: `./ringer_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("RINGER_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by RINGER_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "ringer configuration file '{}' not found in any of these locations:\n{}\n\nSet RINGER_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, names an
/// unknown strategy, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<RingerConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: RingerConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `RINGER_LOG_LEVEL` -> `logging.level`
/// - `RINGER_LOG_FORMAT` -> `logging.format`
/// - `RINGER_LOG_DIR` -> `logging.log_dir`
/// - `RINGER_TRAINING_EPOCHS` -> `training.epochs`
/// - `RINGER_HIDDEN_ACTIVATION` -> `network.hidden_activation`
/// - `RINGER_OUTPUT_ACTIVATION` -> `network.output_activation`
/// - `RINGER_SYNAPSE_STRATEGY` -> `network.synapse_strategy` (default parameters)
///
/// Unparseable numbers are ignored; unknown strategy names are errors.
pub fn apply_environment_overrides(config: &mut RingerConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("RINGER_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("RINGER_LOG_FORMAT") {
        config.logging.format = value.parse::<LogFormat>()?;
    }
    if let Ok(value) = env::var("RINGER_LOG_DIR") {
        config.logging.log_dir = Some(PathBuf::from(value));
    }
    if let Ok(value) = env::var("RINGER_TRAINING_EPOCHS") {
        if let Ok(epochs) = value.parse::<usize>() {
            config.training.epochs = epochs;
        }
    }
    if let Ok(value) = env::var("RINGER_HIDDEN_ACTIVATION") {
        config.network.hidden_activation = value.parse::<ActivationFunction>()?;
    }
    if let Ok(value) = env::var("RINGER_OUTPUT_ACTIVATION") {
        config.network.output_activation = value.parse::<ActivationFunction>()?;
    }
    if let Ok(value) = env::var("RINGER_SYNAPSE_STRATEGY") {
        let kind = value.parse::<SynapseStrategyKind>()?;
        if kind != config.network.synapse_strategy.kind() {
            config.network.synapse_strategy = SynapseStrategyConfig::default_for(kind);
        }
    }
    Ok(())
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"epochs": "500", "hidden_activation": "sigmoid"}`)
pub fn apply_cli_overrides(
    config: &mut RingerConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.parse::<LogFormat>()?;
    }
    if let Some(value) = cli_args.get("epochs") {
        if let Ok(epochs) = value.parse::<usize>() {
            config.training.epochs = epochs;
        }
    }
    if let Some(value) = cli_args.get("learning") {
        config.training.learning = value.to_lowercase() == "true" || value == "1";
    }
    if let Some(value) = cli_args.get("hidden_activation") {
        config.network.hidden_activation = value.parse::<ActivationFunction>()?;
    }
    if let Some(value) = cli_args.get("output_activation") {
        config.network.output_activation = value.parse::<ActivationFunction>()?;
    }
    if let Some(value) = cli_args.get("synapse_strategy") {
        let kind = value.parse::<SynapseStrategyKind>()?;
        if kind != config.network.synapse_strategy.kind() {
            config.network.synapse_strategy = SynapseStrategyConfig::default_for(kind);
        }
    }
    if let Some(value) = cli_args.get("initial_weight") {
        if let Ok(weight) = value.parse::<f64>() {
            config.network.initial_weight = weight;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "RINGER_LOG_LEVEL",
            "RINGER_LOG_FORMAT",
            "RINGER_LOG_DIR",
            "RINGER_TRAINING_EPOCHS",
            "RINGER_HIDDEN_ACTIVATION",
            "RINGER_OUTPUT_ACTIVATION",
            "RINGER_SYNAPSE_STRATEGY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("RINGER_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("RINGER_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("RINGER_CONFIG_PATH", "/definitely/not/here.toml");
        let result = find_config_file();
        env::remove_var("RINGER_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[training]").unwrap();
        writeln!(file, "epochs = 25").unwrap();
        writeln!(file, "[network]").unwrap();
        writeln!(file, "hidden_activation = \"sigmoid\"").unwrap();
        writeln!(file, "[network.synapse_strategy]").unwrap();
        writeln!(file, "strategy = \"backprop\"").unwrap();
        writeln!(file, "learning_rate = 0.05").unwrap();
        writeln!(file, "momentum = 0.5").unwrap();
        writeln!(file, "decay = 0.99").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.training.epochs, 25);
        assert_eq!(config.network.hidden_activation, ActivationFunction::Sigmoid);
        assert_eq!(config.network.output_activation, ActivationFunction::Tanh);
        assert_eq!(
            config.network.synapse_strategy,
            SynapseStrategyConfig::backprop(0.05, 0.5, 0.99)
        );
    }

    #[test]
    fn test_unknown_activation_in_file_is_rejected() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[network]\nhidden_activation = \"relu\"\n").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[training]\nepochs = 0\n").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = RingerConfig::default();

        env::set_var("RINGER_TRAINING_EPOCHS", "42");
        env::set_var("RINGER_OUTPUT_ACTIVATION", "linear");
        env::set_var("RINGER_SYNAPSE_STRATEGY", "backprop");

        let result = apply_environment_overrides(&mut config);
        clear_env();

        assert!(result.is_ok());
        assert_eq!(config.training.epochs, 42);
        assert_eq!(config.network.output_activation, ActivationFunction::Linear);
        assert_eq!(config.network.synapse_strategy.kind(), SynapseStrategyKind::BackProp);
    }

    #[test]
    fn test_environment_unknown_strategy() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = RingerConfig::default();

        env::set_var("RINGER_SYNAPSE_STRATEGY", "quickprop");
        let result = apply_environment_overrides(&mut config);
        clear_env();

        assert!(matches!(result, Err(ConfigError::UnknownStrategy { kind: "synapse", .. })));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = RingerConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("epochs".to_string(), "7".to_string());
        cli_args.insert("hidden_activation".to_string(), "linear".to_string());
        cli_args.insert("learning".to_string(), "false".to_string());

        apply_cli_overrides(&mut config, &cli_args).unwrap();

        assert_eq!(config.training.epochs, 7);
        assert_eq!(config.network.hidden_activation, ActivationFunction::Linear);
        assert!(!config.training.learning);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[training]\nepochs = 10\n[logging]\nlevel = \"warn\"\n").unwrap();

        env::set_var("RINGER_TRAINING_EPOCHS", "20");
        env::set_var("RINGER_LOG_LEVEL", "debug");

        let mut cli_args = HashMap::new();
        cli_args.insert("epochs".to_string(), "30".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args));
        clear_env();
        let config = config.unwrap();

        // CLI wins for epochs, env wins for level (no CLI override)
        assert_eq!(config.training.epochs, 30);
        assert_eq!(config.logging.level, "debug");
    }
}
