//! Configuration module
//!
//! Holds the immutable target table and the settings for the external
//! collaborators (VPN client, credential store, sidecar file). Loaded once
//! at startup from TOML and passed explicitly to everything that needs it.

use crate::error::{AuthError, ConfigError};
use crate::types::{ALL_TARGETS, DEFAULT_OTP_GENERATOR, KEYRING_SERVICE_MASTER, STATE_FILE_NAME};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub mod toml_config;

/// Case-insensitive regular expression matched against profile display names
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile `source` case-insensitively
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Remove every match of the pattern from `text`
    pub fn strip(&self, text: &str) -> String {
        self.regex.replace_all(text, "").into_owned()
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for NamePattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(&source)
    }
}

impl PartialEq for NamePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for NamePattern {}

/// How a target authenticates when connecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode<'a> {
    /// A one-time code is generated for this label and attached to `start`
    Otp { label: &'a str },
    /// Federated single sign-on; no code is requested
    Sso,
}

/// One configured VPN target
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Short human-chosen name, unique across the table
    pub alias: String,

    /// Matched against live profile display names
    pub pattern: NamePattern,

    /// Label passed to the OTP generator; empty for SSO targets
    #[serde(default)]
    pub otp_label: String,

    /// Skip OTP generation entirely
    #[serde(default)]
    pub sso: bool,
}

impl TargetConfig {
    /// Create a target that authenticates with a generated one-time code
    pub fn with_otp(alias: &str, pattern: &str, otp_label: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            alias: alias.to_string(),
            pattern: compile_target_pattern(alias, pattern)?,
            otp_label: otp_label.to_string(),
            sso: false,
        })
    }

    /// Create a target that authenticates through single sign-on
    pub fn with_sso(alias: &str, pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            alias: alias.to_string(),
            pattern: compile_target_pattern(alias, pattern)?,
            otp_label: String::new(),
            sso: true,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn auth_mode(&self) -> AuthMode<'_> {
        if self.sso {
            AuthMode::Sso
        } else {
            AuthMode::Otp {
                label: &self.otp_label,
            }
        }
    }

    /// Generator label for a non-SSO target
    pub fn require_otp_label(&self) -> Result<&str, ConfigError> {
        match self.auth_mode() {
            AuthMode::Otp { label } => Ok(label),
            AuthMode::Sso => Err(ConfigError::ValidationError {
                message: format!("Target '{}' uses SSO and has no OTP label", self.alias),
            }),
        }
    }

    /// Validate a single target entry
    pub fn validate(&self) -> Result<(), String> {
        if self.alias.trim().is_empty() {
            return Err("Target alias cannot be empty".to_string());
        }

        if self.alias.eq_ignore_ascii_case(ALL_TARGETS) {
            return Err(format!("Target alias '{}' is reserved", ALL_TARGETS));
        }

        if self.alias.chars().any(char::is_whitespace) {
            return Err(format!("Target alias '{}' cannot contain whitespace", self.alias));
        }

        // Exactly one authentication method per target
        match (self.otp_label.trim().is_empty(), self.sso) {
            (true, false) => Err(format!(
                "Target '{}' needs either an otp_label or sso = true",
                self.alias
            )),
            (false, true) => Err(format!(
                "Target '{}' sets both otp_label and sso = true",
                self.alias
            )),
            _ => Ok(()),
        }
    }
}

fn compile_target_pattern(alias: &str, pattern: &str) -> Result<NamePattern, ConfigError> {
    NamePattern::new(pattern).map_err(|e| ConfigError::ValidationError {
        message: format!("Invalid pattern for target '{}': {}", alias, e),
    })
}

/// Location of the external VPN client
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    /// Explicit path to the client executable; discovered when unset
    pub binary: Option<PathBuf>,
}

/// Where the generator master password lives and how codes are produced
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CredentialSettings {
    /// Keyring service name
    #[serde(default = "default_keyring_service")]
    pub service: String,

    /// Keyring account; the current OS user when unset
    pub account: Option<String>,

    /// OTP generator executable
    #[serde(default = "default_generator")]
    pub generator: PathBuf,
}

impl CredentialSettings {
    /// Resolve the keyring account, falling back to `$USER`
    ///
    /// Called only when a code is generated.
    pub fn account(&self) -> Result<String, AuthError> {
        if let Some(account) = &self.account {
            return Ok(account.clone());
        }
        std::env::var("USER").map_err(|_| AuthError::MissingAccount)
    }
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            service: default_keyring_service(),
            account: None,
            generator: default_generator(),
        }
    }
}

fn default_keyring_service() -> String {
    KEYRING_SERVICE_MASTER.to_string()
}

fn default_generator() -> PathBuf {
    PathBuf::from(DEFAULT_OTP_GENERATOR)
}

/// Sidecar state file settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StateSettings {
    /// Sidecar path; `$HOME/.vpn_active` when unset
    pub file: Option<PathBuf>,
}

impl StateSettings {
    pub fn path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(file) = &self.file {
            return Ok(file.clone());
        }
        let home = std::env::var("HOME").map_err(|_| ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })?;
        Ok(PathBuf::from(home).join(STATE_FILE_NAME))
    }
}

/// Display-name cleanup rules for the status dashboard
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSettings {
    #[serde(default = "default_name_prefix")]
    pub name_prefix: NamePattern,

    #[serde(default = "default_name_suffix")]
    pub name_suffix: NamePattern,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            name_prefix: default_name_prefix(),
            name_suffix: default_name_suffix(),
        }
    }
}

fn default_name_prefix() -> NamePattern {
    NamePattern::new(".*sso_").expect("default prefix pattern is valid")
}

fn default_name_suffix() -> NamePattern {
    NamePattern::new("vpnusers.*").expect("default suffix pattern is valid")
}

/// Reconciliation timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,

    #[serde(default = "default_disconnect_secs")]
    pub disconnect_secs: u64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn disconnect(&self) -> Duration {
        Duration::from_secs(self.disconnect_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: default_connect_secs(),
            disconnect_secs: default_disconnect_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_connect_secs() -> u64 {
    30
}

fn default_disconnect_secs() -> u64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    500
}

/// Complete vpnctl configuration
///
/// Immutable once loaded. `targets` keeps file order, which is the
/// iteration order for the state mirror and for `disconnect all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VpnctlConfig {
    #[serde(default)]
    pub client: ClientSettings,

    #[serde(default)]
    pub credentials: CredentialSettings,

    #[serde(default)]
    pub state: StateSettings,

    #[serde(default)]
    pub status: StatusSettings,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl VpnctlConfig {
    /// Create a configuration with default settings around `targets`
    pub fn with_targets(targets: Vec<TargetConfig>) -> Self {
        Self {
            targets,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.targets.is_empty() {
            return Err("At least one [[targets]] entry is required".to_string());
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            target.validate()?;
            if !seen.insert(target.alias.as_str()) {
                return Err(format!("Duplicate target alias '{}'", target.alias));
            }
        }

        if self.timeouts.connect_secs == 0 || self.timeouts.disconnect_secs == 0 {
            return Err("Timeouts cannot be zero".to_string());
        }

        if self.timeouts.poll_interval_ms == 0 {
            return Err("Poll interval cannot be zero".to_string());
        }

        if self.credentials.service.trim().is_empty() {
            return Err("Keyring service cannot be empty".to_string());
        }

        Ok(())
    }

    /// Look up a configured target by alias
    pub fn target(&self, alias: &str) -> Result<&TargetConfig, ConfigError> {
        self.targets
            .iter()
            .find(|t| t.alias == alias)
            .ok_or_else(|| ConfigError::UnknownTarget {
                alias: alias.to_string(),
                available: self.aliases().join(", "),
            })
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.alias.as_str()).collect()
    }

    /// First target, in table order, whose pattern matches a display name
    ///
    /// This is the single alias-matching rule shared by profile resolution
    /// and the state mirror.
    pub fn match_alias_for_name(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VpnctlConfig {
        VpnctlConfig::with_targets(vec![
            TargetConfig::with_otp("dev", "sso_ackodevvpnusers", "devvpn").unwrap(),
            TargetConfig::with_otp("prod", "sso_ackoprodvpnuser", "prodvpn").unwrap(),
            TargetConfig::with_sso("life", "sso_ackolifevpnusers").unwrap(),
        ])
    }

    #[test]
    fn test_pattern_is_case_insensitive() {
        let pattern = NamePattern::new("sso_ackodevvpnusers").unwrap();
        assert!(pattern.is_match("SSO_AckoDevVPNUsers"));
        assert!(pattern.is_match("prefix-sso_ackodevvpnusers_old"));
        assert!(!pattern.is_match("sso_ackoprodvpnusers"));
    }

    #[test]
    fn test_sample_config_is_valid() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_exactly_one_auth_method() {
        for target in &sample().targets {
            assert!(!target.otp_label.is_empty() ^ target.sso);
        }

        let mut neither = TargetConfig::with_sso("x", "x").unwrap();
        neither.sso = false;
        assert!(neither.validate().is_err());

        let mut both = TargetConfig::with_otp("y", "y", "label").unwrap();
        both.sso = true;
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_duplicate_and_reserved_aliases_rejected() {
        let mut config = sample();
        config
            .targets
            .push(TargetConfig::with_sso("dev", "other").unwrap());
        assert_eq!(
            config.validate().unwrap_err(),
            "Duplicate target alias 'dev'"
        );

        let config = VpnctlConfig::with_targets(vec![TargetConfig::with_sso("all", "x").unwrap()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_target_lists_available() {
        let config = sample();
        let err = config.target("staging").unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownTarget {
                alias: "staging".to_string(),
                available: "dev, prod, life".to_string(),
            }
        );
    }

    #[test]
    fn test_match_alias_for_name_uses_table_order() {
        let config = VpnctlConfig::with_targets(vec![
            TargetConfig::with_sso("broad", "acko").unwrap(),
            TargetConfig::with_sso("narrow", "ackodev").unwrap(),
        ]);
        let matched = config.match_alias_for_name("sso_AckoDevVPNUsers").unwrap();
        assert_eq!(matched.alias, "broad");
        assert!(config.match_alias_for_name("unrelated").is_none());
    }

    #[test]
    fn test_auth_mode() {
        let config = sample();
        assert_eq!(
            config.target("dev").unwrap().auth_mode(),
            AuthMode::Otp { label: "devvpn" }
        );
        assert_eq!(config.target("life").unwrap().auth_mode(), AuthMode::Sso);
    }

    #[test]
    fn test_require_otp_label() {
        let config = sample();
        assert_eq!(config.target("prod").unwrap().require_otp_label(), Ok("prodvpn"));

        let err = config.target("life").unwrap().require_otp_label().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration validation error: Target 'life' uses SSO and has no OTP label"
        );
    }

    #[test]
    fn test_explicit_account_is_used_as_is() {
        let credentials = CredentialSettings {
            account: Some("alice".to_string()),
            ..CredentialSettings::default()
        };
        assert_eq!(credentials.account(), Ok("alice".to_string()));
    }
}
