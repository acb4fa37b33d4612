//! Error types for the vpnctl CLI tool
//!
//! This module defines all error types used throughout the application,
//! providing consistent error handling and user-friendly error messages.

use thiserror::Error;

/// Main error type for the vpnctl application
#[derive(Error, Debug)]
pub enum VpnctlError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors raised while talking to the VPN client
    #[error("VPN error: {0}")]
    Vpn(#[from] VpnError),

    /// Errors related to credential retrieval and OTP generation
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<KeyringError> for VpnctlError {
    fn from(err: KeyringError) -> Self {
        VpnctlError::Auth(AuthError::Keyring(err))
    }
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown target: '{alias}'. Available targets: {available}")]
    UnknownTarget { alias: String, available: String },

    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// Errors raised by the VPN client directory and connection operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VpnError {
    #[error("VPN client binary not found at {path}")]
    BinaryNotFound { path: String },

    #[error("`{command}` failed: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("Failed to parse profile listing: {reason}")]
    ParseError { reason: String },

    #[error("Invalid profile pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No profile found matching '{pattern}'")]
    ProfileNotFound { pattern: String },

    #[error("Timed out after {seconds} seconds waiting for VPN state change")]
    ConnectionTimeout { seconds: u64 },
}

/// Credential and one-time code errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0}")]
    Keyring(#[from] KeyringError),

    #[error("No keyring account configured and USER is not set")]
    MissingAccount,

    #[error("Keyring returned an empty master password")]
    EmptySecret,

    #[error("OTP generator failed: {reason}")]
    GeneratorFailed { reason: String },

    #[error("OTP generator returned an empty code")]
    EmptyCode,
}

/// System keyring operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyringError {
    #[error("Keyring service unavailable")]
    ServiceUnavailable,

    #[error("Failed to store credential in keyring")]
    StoreFailed,

    #[error("Failed to retrieve credential from keyring")]
    RetrieveFailed,
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VpnctlError>;
