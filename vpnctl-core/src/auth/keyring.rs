//! Keyring operations for secure credential storage
//!
//! Uses the system keyring (macOS Keychain, Secret Service on Linux) to
//! hold the OTP generator's master password.

use crate::error::{AuthError, KeyringError};
use crate::types::MasterPassword;
use keyring::Entry;

/// Store the generator master password in the system keyring
pub fn store_master_password(
    service: &str,
    account: &str,
    password: &MasterPassword,
) -> Result<(), AuthError> {
    let entry = Entry::new(service, account).map_err(|_| KeyringError::ServiceUnavailable)?;

    entry
        .set_password(password.expose())
        .map_err(|_| KeyringError::StoreFailed)?;

    Ok(())
}

/// Retrieve the generator master password from the system keyring
///
/// An empty or whitespace-only entry is an error: no code can be produced
/// from it.
pub fn retrieve_master_password(service: &str, account: &str) -> Result<MasterPassword, AuthError> {
    let entry = Entry::new(service, account).map_err(|_| KeyringError::ServiceUnavailable)?;

    let password = entry
        .get_password()
        .map_err(|_| KeyringError::RetrieveFailed)?;

    let password = MasterPassword::new(password.trim().to_string());
    if password.is_empty() {
        return Err(AuthError::EmptySecret);
    }
    Ok(password)
}

/// Check if a master password exists for the given service and account
pub fn has_master_password(service: &str, account: &str) -> Result<bool, AuthError> {
    let entry = Entry::new(service, account).map_err(|_| KeyringError::ServiceUnavailable)?;

    match entry.get_password() {
        Ok(_) => Ok(true),
        Err(_) => Ok(false),
    }
}
