//! Mock keyring implementation for testing
//!
//! Provides an in-memory keyring implementation that doesn't require
//! system keyring access. Used in CI environments and for testing.

use crate::error::{AuthError, KeyringError};
use crate::types::MasterPassword;
use std::collections::HashMap;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref MOCK_KEYRING: Mutex<HashMap<String, String>> = Mutex::new(HashMap::new());
}

/// Generate a key for the mock keyring
fn make_key(service: &str, account: &str) -> String {
    format!("{}:{}", service, account)
}

/// Store the generator master password in the mock keyring
pub fn store_master_password(
    service: &str,
    account: &str,
    password: &MasterPassword,
) -> Result<(), AuthError> {
    let mut keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| KeyringError::StoreFailed)?;
    keyring.insert(make_key(service, account), password.expose().to_string());
    Ok(())
}

/// Retrieve the generator master password from the mock keyring
pub fn retrieve_master_password(service: &str, account: &str) -> Result<MasterPassword, AuthError> {
    let keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| KeyringError::RetrieveFailed)?;
    let stored = keyring
        .get(&make_key(service, account))
        .cloned()
        .ok_or(KeyringError::RetrieveFailed)?;

    let password = MasterPassword::new(stored.trim().to_string());
    if password.is_empty() {
        return Err(AuthError::EmptySecret);
    }
    Ok(password)
}

/// Check if a master password exists in the mock keyring
pub fn has_master_password(service: &str, account: &str) -> Result<bool, AuthError> {
    let keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| KeyringError::ServiceUnavailable)?;
    Ok(keyring.contains_key(&make_key(service, account)))
}
