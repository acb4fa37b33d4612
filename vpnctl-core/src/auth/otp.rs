//! One-time code generation
//!
//! The master password is read from the keyring and piped into an external
//! TOTP generator (`cotp --password-stdin extract --label <label>`), which
//! prints the current code on stdout.

use crate::auth::keyring;
use crate::config::CredentialSettings;
use crate::error::AuthError;
use crate::types::{MasterPassword, OtpCode};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Source of one-time codes for non-SSO targets
#[allow(async_fn_in_trait)]
pub trait OtpProvider {
    /// Produce the current code for `label`
    async fn one_time_code(&self, label: &str) -> Result<OtpCode, AuthError>;
}

/// Keyring-backed `cotp` generator
#[derive(Debug, Clone)]
pub struct CotpGenerator {
    credentials: CredentialSettings,
}

impl CotpGenerator {
    pub fn new(service: String, account: String, generator: PathBuf) -> Self {
        Self {
            credentials: CredentialSettings {
                service,
                account: Some(account),
                generator,
            },
        }
    }

    /// The keyring account is resolved when a code is requested
    pub fn from_settings(settings: &CredentialSettings) -> Self {
        Self {
            credentials: settings.clone(),
        }
    }

    /// Run the generator with an already retrieved master password
    pub async fn generate_with_password(
        &self,
        password: &MasterPassword,
        label: &str,
    ) -> Result<OtpCode, AuthError> {
        debug!("Running OTP generator {:?} for label {}", self.credentials.generator, label);

        let mut child = Command::new(&self.credentials.generator)
            .args(["--password-stdin", "extract", "--label", label])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AuthError::GeneratorFailed {
                reason: format!("failed to spawn {}: {}", self.credentials.generator.display(), e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // The generator may exit before reading; its status says why
            if let Err(e) = stdin.write_all(password.expose().as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(AuthError::GeneratorFailed {
                        reason: format!("failed to write master password: {}", e),
                    });
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| AuthError::GeneratorFailed {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(AuthError::GeneratorFailed {
                reason: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    format!("{}: {}", output.status, stderr)
                },
            });
        }

        let code = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if code.is_empty() {
            return Err(AuthError::EmptyCode);
        }
        Ok(OtpCode::new(code))
    }
}

impl OtpProvider for CotpGenerator {
    async fn one_time_code(&self, label: &str) -> Result<OtpCode, AuthError> {
        let account = self.credentials.account()?;
        let password = keyring::retrieve_master_password(&self.credentials.service, &account)?;
        self.generate_with_password(&password, label).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_master_password_fails_before_spawning() {
        let generator = CotpGenerator::new(
            "otp-test-service".to_string(),
            "nobody".to_string(),
            PathBuf::from("/nonexistent/cotp"),
        );

        let err = generator.one_time_code("devvpn").await.unwrap_err();
        assert!(matches!(err, AuthError::Keyring(_)));
    }

    #[tokio::test]
    async fn test_missing_generator_binary() {
        keyring::store_master_password(
            "otp-test-service",
            "alice",
            &MasterPassword::new("pw".to_string()),
        )
        .unwrap();
        let generator = CotpGenerator::new(
            "otp-test-service".to_string(),
            "alice".to_string(),
            PathBuf::from("/nonexistent/cotp"),
        );

        let err = generator.one_time_code("devvpn").await.unwrap_err();
        assert!(matches!(err, AuthError::GeneratorFailed { .. }));
    }
}
