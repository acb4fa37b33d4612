//! Pritunl client subprocess integration
//!
//! Every interaction with the VPN goes through the client's CLI:
//! `list -j`, `start <id> [--password <code>]` and `stop <id>`.

use crate::config::ClientSettings;
use crate::error::VpnError;
use crate::types::OtpCode;
use crate::vpn::profile::{parse_listing, Profile};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Client executable inside the macOS application bundle
const MACOS_BUNDLE_BINARY: &str = "/Applications/Pritunl.app/Contents/Resources/pritunl-client";

/// Client executable name looked up on PATH
const CLIENT_BINARY_NAME: &str = "pritunl-client";

/// Operations the external VPN client exposes
#[allow(async_fn_in_trait)]
pub trait VpnClient {
    /// Current profile directory, in the client's listing order
    async fn list_profiles(&self) -> Result<Vec<Profile>, VpnError>;

    /// Ask the client to start a profile, returning its stdout
    async fn start(&self, id: &str, code: Option<&OtpCode>) -> Result<String, VpnError>;

    /// Ask the client to stop a profile, returning its stdout
    async fn stop(&self, id: &str) -> Result<String, VpnError>;
}

/// `pritunl-client` driven as a subprocess
#[derive(Debug, Clone)]
pub struct PritunlClient {
    binary: PathBuf,
}

impl PritunlClient {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }

    /// Build a client from configuration, discovering the binary if unset
    ///
    /// Discovery order: the macOS app bundle, then `pritunl-client` on PATH.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, VpnError> {
        if let Some(binary) = &settings.binary {
            return Ok(Self::new(binary.clone()));
        }

        let bundled = Path::new(MACOS_BUNDLE_BINARY);
        if bundled.exists() {
            return Ok(Self::new(bundled.to_path_buf()));
        }

        which::which(CLIENT_BINARY_NAME)
            .map(Self::new)
            .map_err(|_| VpnError::BinaryNotFound {
                path: CLIENT_BINARY_NAME.to_string(),
            })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run the client and capture stdout
    ///
    /// `command` names the command in errors; it never contains the code.
    async fn run(&self, args: &[&str], command: &str) -> Result<String, VpnError> {
        debug!("Running {} {}", self.binary.display(), command);

        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => VpnError::BinaryNotFound {
                    path: self.binary.display().to_string(),
                },
                _ => VpnError::CommandFailed {
                    command: command.to_string(),
                    reason: e.to_string(),
                },
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(VpnError::CommandFailed {
                command: command.to_string(),
                reason: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    format!("{}: {}", output.status, stderr)
                },
            });
        }
        if !stderr.is_empty() {
            return Err(VpnError::CommandFailed {
                command: command.to_string(),
                reason: stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VpnClient for PritunlClient {
    async fn list_profiles(&self) -> Result<Vec<Profile>, VpnError> {
        let output = self.run(&["list", "-j"], "list -j").await?;
        parse_listing(&output)
    }

    async fn start(&self, id: &str, code: Option<&OtpCode>) -> Result<String, VpnError> {
        let command = format!("start {}", id);
        match code {
            Some(code) => {
                self.run(&["start", id, "--password", code.expose()], &command)
                    .await
            }
            None => self.run(&["start", id], &command).await,
        }
    }

    async fn stop(&self, id: &str) -> Result<String, VpnError> {
        self.run(&["stop", id], &format!("stop {}", id)).await
    }
}
