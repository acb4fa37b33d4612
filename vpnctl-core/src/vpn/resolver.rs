//! Profile resolution
//!
//! Maps a target's name pattern to the identifier the VPN client assigned
//! at import time. Identifiers are not stable across re-imports, so every
//! operation resolves against a fresh listing.
//!
//! Resolution is first-match in listing order. Two imported profiles that
//! both match one pattern resolve to whichever the client lists first.

use crate::config::{NamePattern, TargetConfig};
use crate::error::VpnError;
use crate::vpn::client::VpnClient;
use crate::vpn::profile::Profile;
use tracing::debug;

/// First profile, in listing order, whose name matches `pattern`
pub fn first_match<'a>(profiles: &'a [Profile], pattern: &NamePattern) -> Option<&'a Profile> {
    profiles.iter().find(|p| pattern.is_match(&p.name))
}

/// Resolve a raw, case-insensitive pattern to a profile identifier
pub async fn resolve_profile_id<C: VpnClient>(client: &C, pattern: &str) -> Result<String, VpnError> {
    let compiled = NamePattern::new(pattern).map_err(|e| VpnError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    resolve_pattern(client, &compiled).await
}

/// Resolve a configured target to a profile identifier
pub async fn resolve_target<C: VpnClient>(client: &C, target: &TargetConfig) -> Result<String, VpnError> {
    resolve_pattern(client, &target.pattern).await
}

async fn resolve_pattern<C: VpnClient>(client: &C, pattern: &NamePattern) -> Result<String, VpnError> {
    let profiles = client.list_profiles().await?;

    let profile = first_match(&profiles, pattern).ok_or_else(|| VpnError::ProfileNotFound {
        pattern: pattern.as_str().to_string(),
    })?;

    debug!(
        "Pattern '{}' resolved to profile {} ({})",
        pattern.as_str(),
        profile.id,
        profile.name
    );
    Ok(profile.id.clone())
}
