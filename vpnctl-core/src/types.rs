//! Type definitions and wrappers for secure data handling
//!
//! Sensitive values are wrapped with the secrecy crate so they never end up
//! in logs or debug output.

use secrecy::{ExposeSecret, Secret};

/// Master password for the OTP generator, as held in the system keyring
///
/// Never logged. Only exposed when piped into the generator's stdin.
#[derive(Clone, Debug)]
pub struct MasterPassword(Secret<String>);

impl MasterPassword {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    /// Expose the password value (use with caution!)
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl From<String> for MasterPassword {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

/// One-time code produced by the generator for a single connect attempt
///
/// Short-lived, but still treated as sensitive: it travels on the VPN
/// client's command line and nowhere else.
#[derive(Clone, Debug)]
pub struct OtpCode(Secret<String>);

impl OtpCode {
    pub fn new(code: String) -> Self {
        Self(Secret::new(code))
    }

    /// Expose the code value (use with caution!)
    ///
    /// This should only be called when handing the code to the VPN client
    /// or printing it for the `otp` command.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for OtpCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

/// Default keyring service holding the generator master password
pub const KEYRING_SERVICE_MASTER: &str = "cotp-master-password";

/// Default OTP generator executable
pub const DEFAULT_OTP_GENERATOR: &str = "cotp";

/// Sidecar file name, relative to the user's home directory
pub const STATE_FILE_NAME: &str = ".vpn_active";

/// Label written to the sidecar for connected profiles no target claims
pub const UNKNOWN_ALIAS_LABEL: &str = "UNKNOWN";

/// Reserved alias meaning "every configured target" for disconnect
pub const ALL_TARGETS: &str = "all";
