//! Local state mirror
//!
//! After a connect or disconnect, the aliases of every connected profile are
//! written to a sidecar file (`~/.vpn_active` by default) for shell prompt
//! integrations. The file holds uppercased aliases joined by single spaces.
//! A missing file means nothing is connected.
//!
//! Refreshing is best-effort: failures are logged and never returned.

use crate::config::{StateSettings, VpnctlConfig};
use crate::error::ConfigError;
use crate::types::UNKNOWN_ALIAS_LABEL;
use crate::vpn::client::VpnClient;
use crate::vpn::profile::Profile;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sidecar labels for the connected profiles of one snapshot
///
/// Listing order is kept; a label appears at most once. Connected profiles
/// no target claims are labelled `UNKNOWN`.
pub fn active_aliases(profiles: &[Profile], config: &VpnctlConfig) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for profile in profiles.iter().filter(|p| p.connected) {
        let label = config
            .match_alias_for_name(&profile.name)
            .map(|target| target.alias.to_uppercase())
            .unwrap_or_else(|| UNKNOWN_ALIAS_LABEL.to_string());

        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    labels
}

/// Sidecar file writer
#[derive(Debug, Clone)]
pub struct StateMirror {
    path: PathBuf,
}

impl StateMirror {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_settings(settings: &StateSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the directory and rewrite the sidecar
    ///
    /// A listing failure leaves the existing file untouched.
    pub async fn refresh<C: VpnClient>(&self, client: &C, config: &VpnctlConfig) {
        let profiles = match client.list_profiles().await {
            Ok(profiles) => profiles,
            Err(e) => {
                debug!("Skipping state mirror refresh: {}", e);
                return;
            }
        };

        let labels = active_aliases(&profiles, config);
        if let Err(e) = self.write(&labels) {
            warn!("Failed to update state file {:?}: {}", self.path, e);
        }
    }

    /// Replace the sidecar contents; an empty set removes the file
    pub fn write(&self, labels: &[String]) -> std::io::Result<()> {
        if labels.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            };
        }

        std::fs::write(&self.path, labels.join(" "))?;
        debug!("Wrote {:?} to {:?}", labels, self.path);
        Ok(())
    }

    /// Labels currently in the sidecar; empty when the file is absent
    pub fn read(&self) -> std::io::Result<Vec<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(contents.split_whitespace().map(str::to_string).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
