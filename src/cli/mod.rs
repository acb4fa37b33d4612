//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod otp;
pub mod setup;
pub mod targets;
pub mod vpn;

use std::path::Path;
use vpnctl_core::config::{toml_config, VpnctlConfig};
use vpnctl_core::error::VpnctlError;

/// Load configuration from `--config` or the default location
pub fn load_config(path: Option<&Path>) -> Result<VpnctlConfig, VpnctlError> {
    match path {
        Some(path) => toml_config::load_config_from_path(path),
        None => toml_config::load_config(),
    }
}

/// Run the version command
pub fn run_version() {
    println!("vpnctl version {}", env!("CARGO_PKG_VERSION"));
}
