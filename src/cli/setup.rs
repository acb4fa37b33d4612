//! Setup command implementation
//!
//! Stores the OTP generator's master password in the system keyring.

use std::io::{self, Write};
use std::path::Path;
use vpnctl_core::auth::keyring;
use vpnctl_core::config::CredentialSettings;
use vpnctl_core::error::{ConfigError, VpnctlError};
use vpnctl_core::types::MasterPassword;

use super::load_config;

/// Run the setup command
pub fn run_setup(config_path: Option<&Path>) -> Result<(), VpnctlError> {
    println!("🔐 vpnctl Setup");
    println!("===============");
    println!();
    println!("The master password unlocks your OTP generator database.");
    println!("It will be stored in your system keyring.");
    println!();

    let credentials = credential_settings(config_path)?;
    let account = credentials.account()?;

    if keyring::has_master_password(&credentials.service, &account)? {
        println!(
            "⚠️  A master password is already stored for {} ({}).",
            credentials.service, account
        );
        if !prompt_yes_no("Overwrite it? (y/N)", false)? {
            println!("Setup cancelled.");
            return Ok(());
        }
        println!();
    }

    let password = collect_master_password()?;
    keyring::store_master_password(&credentials.service, &account, &password)?;

    println!("✅ Master password stored.");
    println!();
    println!("You can now use:");
    println!("  vpnctl connect <alias>    - Connect to a VPN target");
    println!("  vpnctl disconnect <alias> - Disconnect a target, or `all`");
    println!("  vpnctl otp <alias>        - Print the current one-time code");

    Ok(())
}

/// Credential settings from the config file, or defaults when there is none yet
fn credential_settings(config_path: Option<&Path>) -> Result<CredentialSettings, VpnctlError> {
    match load_config(config_path) {
        Ok(config) => Ok(config.credentials),
        Err(VpnctlError::Config(ConfigError::LoadFailed { path })) => {
            println!("ℹ️  No configuration at {}, using default keyring entry.", path);
            println!();
            Ok(CredentialSettings::default())
        }
        Err(e) => Err(e),
    }
}

/// Prompt until a non-empty password is entered twice
fn collect_master_password() -> Result<MasterPassword, VpnctlError> {
    loop {
        let password = MasterPassword::new(rpassword::prompt_password("Master password: ")?);
        if password.is_empty() {
            println!("❌ Password cannot be empty. Please try again.");
            continue;
        }

        let confirm = rpassword::prompt_password("Confirm master password: ")?;
        if confirm != password.expose() {
            println!("❌ Passwords do not match. Please try again.");
            continue;
        }

        return Ok(password);
    }
}

/// Prompt for a yes/no answer
fn prompt_yes_no(question: &str, default: bool) -> Result<bool, VpnctlError> {
    print!("{} ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Ok(default),
    }
}
