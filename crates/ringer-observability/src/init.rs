// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for ringer
//!
//! Console output always; with the `file-logging` feature and a configured
//! `log_dir`, also rolling per-crate JSON files in a timestamped run folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       ├── ringer-npu-network.log
//!       ├── ringer-npu-plasticity.log
//!       └── ringer.log (combined)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ringer_config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps file writers alive; logs are flushed when dropped
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    /// Run folder receiving log files, if file logging is active
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

fn env_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).with_context(|| format!("Invalid log filter '{}'", directives))
}

/// Install the global subscriber
///
/// # Errors
///
/// Invalid level directives, an unwritable log directory, or a subscriber
/// that is already installed
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = debug_flags.to_filter_string(&config.level);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_filter(env_filter(&filter)?)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter(&filter)?)
            .boxed(),
    };
    layers.push(console);

    #[cfg(feature = "file-logging")]
    let (file_guards, log_dir) = match &config.log_dir {
        Some(base) => {
            let (mut file_layers, guards, run_folder) = file_layers(base, config, &filter)?;
            layers.append(&mut file_layers);
            (guards, Some(run_folder))
        }
        None => (Vec::new(), None),
    };
    #[cfg(not(feature = "file-logging"))]
    let log_dir = {
        if config.log_dir.is_some() {
            eprintln!("Warning: logging.log_dir is set but file logging is not compiled in");
        }
        None
    };

    Registry::default()
        .with(layers)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!(target: "ringer-observability", "Logging initialised with filter '{}'", filter);

    Ok(LoggingGuard {
        #[cfg(feature = "file-logging")]
        _file_guards: file_guards,
        log_dir,
    })
}

#[cfg(feature = "file-logging")]
fn file_layers(
    base_log_dir: &Path,
    config: &LoggingConfig,
    filter: &str,
) -> Result<(
    Vec<BoxedLayer>,
    Vec<tracing_appender::non_blocking::WorkerGuard>,
    PathBuf,
)> {
    use tracing_appender::rolling;

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    cleanup_old_logs(base_log_dir, config.retention_days, config.retention_runs)?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    for crate_name in crate::KNOWN_CRATES {
        let appender = rolling::daily(&run_folder, format!("{}.log", crate_name));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        guards.push(guard);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .json()
                .with_filter(env_filter(&format!("{}=debug,off", crate_name))?)
                .boxed(),
        );
    }

    let combined = rolling::daily(&run_folder, "ringer.log");
    let (writer, guard) = tracing_appender::non_blocking(combined);
    guards.push(guard);
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .json()
            .with_filter(env_filter(filter)?)
            .boxed(),
    );

    Ok((layers, guards, run_folder))
}

/// Remove run folders older than `retention_days`, then all but the newest
/// `retention_runs`
///
/// Returns the number of folders removed. Folders whose name is not a
/// `run_%Y%m%d_%H%M%S` timestamp are left alone.
pub fn cleanup_old_logs(
    base_log_dir: &Path,
    retention_days: u64,
    retention_runs: usize,
) -> Result<usize> {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

    if !base_log_dir.exists() {
        return Ok(0);
    }
    let cutoff = Utc::now() - chrono::Duration::days(retention_days as i64);

    let mut runs: Vec<(PathBuf, DateTime<Utc>)> = Vec::new();
    for entry in std::fs::read_dir(base_log_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let stamp = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix("run_"))
            .and_then(|s| NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S").ok());
        if let Some(naive) = stamp {
            runs.push((path, Utc.from_utc_datetime(&naive)));
        }
    }
    runs.sort_by_key(|(_, created)| *created);

    let expired = runs.iter().filter(|(_, created)| *created < cutoff).count();
    let surplus = runs.len().saturating_sub(expired).saturating_sub(retention_runs);
    let mut removed = 0;
    for (path, _) in runs.iter().take(expired + surplus) {
        match std::fs::remove_dir_all(path) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!(
                "Warning: Failed to remove old log directory {}: {}",
                path.display(),
                e
            ),
        }
    }
    Ok(removed)
}

/// Initialize console logging at the default level
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    init_logging(debug_flags, &LoggingConfig::default())
}
