//! Status dashboard data
//!
//! Turns a listing into display rows. Rendering lives in the binary.

use crate::config::StatusSettings;
use crate::vpn::profile::Profile;

/// One dashboard row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub label: String,
    pub connected: bool,
    /// Only set for connected profiles
    pub uptime: Option<String>,
    /// Only set for connected profiles
    pub client_address: Option<String>,
}

/// Shorten a profile display name for the dashboard
///
/// Strips everything through the prefix pattern and everything from the
/// suffix pattern onward, then uppercases what is left.
pub fn clean_display_name(name: &str, settings: &StatusSettings) -> String {
    let without_prefix = settings.name_prefix.strip(name);
    settings.name_suffix.strip(&without_prefix).to_uppercase()
}

pub fn status_entries(profiles: &[Profile], settings: &StatusSettings) -> Vec<StatusEntry> {
    profiles
        .iter()
        .map(|p| StatusEntry {
            label: clean_display_name(&p.name, settings),
            connected: p.connected,
            uptime: p.uptime.clone().filter(|_| p.connected),
            client_address: p.client_address.clone().filter(|_| p.connected),
        })
        .collect()
}
