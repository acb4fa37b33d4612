//! Authentication module
//!
//! Handles master password storage in the keyring and one-time code
//! generation for non-SSO targets.

// Use mock keyring in test mode or CI environment
#[cfg(any(test, feature = "mock-keyring"))]
#[path = "keyring_mock.rs"]
pub mod keyring;

// Use real keyring in production
#[cfg(not(any(test, feature = "mock-keyring")))]
pub mod keyring;

pub mod otp;

pub use otp::{CotpGenerator, OtpProvider};
