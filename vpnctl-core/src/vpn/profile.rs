//! Profile records as reported by `pritunl-client list -j`

use crate::error::VpnError;
use serde::Deserialize;

/// One entry of the VPN client's profile listing
///
/// Rebuilt from every listing. `id` is only unique within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: String,

    pub name: String,

    /// Connection uptime text; the client reports it under `status`
    #[serde(rename = "status", default)]
    pub uptime: Option<String>,

    /// Address assigned by the VPN server
    #[serde(default)]
    pub client_address: Option<String>,

    #[serde(default)]
    pub connected: bool,
}

impl Profile {
    pub fn new(id: &str, name: &str, connected: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            uptime: None,
            client_address: None,
            connected,
        }
    }
}

/// Parse the JSON array printed by `list -j`
pub fn parse_listing(json: &str) -> Result<Vec<Profile>, VpnError> {
    // An empty directory may be printed as nothing at all
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).map_err(|e| VpnError::ParseError {
        reason: e.to_string(),
    })
}
