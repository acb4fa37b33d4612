//! OTP command implementation
//!
//! Prints the current one-time code for a configured target, for pasting
//! into a client by hand.

use std::path::Path;
use vpnctl_core::auth::{CotpGenerator, OtpProvider};
use vpnctl_core::error::VpnctlError;

use super::load_config;

/// Run the otp command
///
/// Outputs only the code on stdout. Errors are sent to stderr.
pub async fn run_otp(config_path: Option<&Path>, alias: &str) -> Result<(), VpnctlError> {
    let config = load_config(config_path)?;
    let label = config.target(alias)?.require_otp_label()?;

    let generator = CotpGenerator::from_settings(&config.credentials);
    let code = generator.one_time_code(label).await?;

    println!("{}", code.expose());
    Ok(())
}
