//! TOML configuration file I/O
//!
//! Loads the target table and collaborator settings from the user's
//! configuration directory.

use crate::config::VpnctlConfig;
use crate::error::{ConfigError, VpnctlError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the default configuration directory
///
/// Returns ~/.config/vpnctl, or VPNCTL_CONFIG_DIR environment variable if set
pub fn get_config_dir() -> Result<PathBuf, VpnctlError> {
    // Allow tests to override config directory via environment variable
    if let Ok(config_dir) = std::env::var("VPNCTL_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
        // Running under sudo, read the invoking user's configuration
        std::env::var("SUDO_HOME").unwrap_or_else(|_| format!("/home/{}", sudo_user))
    } else {
        std::env::var("HOME").map_err(|_| {
            VpnctlError::Config(ConfigError::IoError {
                message: "HOME environment variable not set".to_string(),
            })
        })?
    };

    Ok(PathBuf::from(home).join(".config").join("vpnctl"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, VpnctlError> {
    let config_dir = get_config_dir()?;
    Ok(config_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default TOML file
pub fn load_config() -> Result<VpnctlConfig, VpnctlError> {
    let config_path = get_config_path()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific TOML file
pub fn load_config_from_path<P: AsRef<Path>>(path: P) -> Result<VpnctlConfig, VpnctlError> {
    let contents = std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => VpnctlError::Config(ConfigError::LoadFailed {
            path: path.as_ref().to_string_lossy().to_string(),
        }),
        _ => VpnctlError::Config(ConfigError::IoError {
            message: format!("Failed to read config file: {}", e),
        }),
    })?;

    let config = parse_config(&contents)?;
    debug!(
        "Loaded {} target(s) from {:?}",
        config.targets.len(),
        path.as_ref()
    );
    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> Result<VpnctlConfig, VpnctlError> {
    let config: VpnctlConfig = toml::from_str(contents).map_err(|e| {
        VpnctlError::Config(ConfigError::ValidationError {
            message: format!("Failed to parse config file: {}", e),
        })
    })?;

    config
        .validate()
        .map_err(|e| VpnctlError::Config(ConfigError::ValidationError { message: e }))?;

    Ok(config)
}
