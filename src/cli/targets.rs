//! Targets command implementation

use std::path::Path;
use vpnctl_core::config::AuthMode;
use vpnctl_core::error::VpnctlError;

use super::load_config;

/// Run the targets command
pub fn run_targets(config_path: Option<&Path>) -> Result<(), VpnctlError> {
    let config = load_config(config_path)?;

    let width = config
        .aliases()
        .iter()
        .map(|alias| alias.len())
        .max()
        .unwrap_or(0);

    for target in &config.targets {
        let auth = match target.auth_mode() {
            AuthMode::Otp { label } => format!("otp:{}", label),
            AuthMode::Sso => "sso".to_string(),
        };
        println!(
            "{:<width$}  {:<16}  {}",
            target.alias,
            auth,
            target.pattern.as_str(),
            width = width
        );
    }

    Ok(())
}
