// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ringer-observability
//!
//! Logging bootstrap shared by every ringer binary and test harness.
//!
//! Installs a `tracing-subscriber` registry driven by `LoggingConfig` (level,
//! text or JSON format) and per-crate debug flags (`--debug-<crate>`,
//! `RINGER_DEBUG`).
//!
//! ## Features
//! - `file-logging`: timestamped run folders with rolling per-crate log files
//!   and retention cleanup

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Log targets emitted by ringer crates, usable with debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ringer",
    "ringer-config",
    "ringer-npu-neural",
    "ringer-npu-plasticity",
    "ringer-npu-network",
    "ringer-observability",
];
