//! Shared fakes for integration tests
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use vpnctl_core::auth::OtpProvider;
use vpnctl_core::config::{TargetConfig, VpnctlConfig};
use vpnctl_core::error::{AuthError, VpnError};
use vpnctl_core::types::OtpCode;
use vpnctl_core::vpn::{Profile, VpnClient};

pub type Listing = Result<Vec<Profile>, VpnError>;

/// VPN client that replays scripted listings
///
/// Each `list_profiles` call pops the next listing; the last one repeats
/// forever. Start/stop commands are recorded.
pub struct ScriptedClient {
    listings: Mutex<VecDeque<Listing>>,
    listing_delay: Duration,
    list_calls: AtomicUsize,
    commands: Mutex<Vec<String>>,
    failing_stops: HashSet<String>,
}

impl ScriptedClient {
    pub fn new(listings: Vec<Listing>) -> Self {
        assert!(!listings.is_empty(), "script needs at least one listing");
        Self {
            listings: Mutex::new(listings.into()),
            listing_delay: Duration::ZERO,
            list_calls: AtomicUsize::new(0),
            commands: Mutex::new(Vec::new()),
            failing_stops: HashSet::new(),
        }
    }

    /// Always return the same listing
    pub fn fixed(profiles: Vec<Profile>) -> Self {
        Self::new(vec![Ok(profiles)])
    }

    /// Every listing call fails
    pub fn unavailable() -> Self {
        Self::new(vec![Err(unavailable())])
    }

    /// Every listing takes `delay` to come back
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.listing_delay = delay;
        self
    }

    pub fn fail_stop(mut self, id: &str) -> Self {
        self.failing_stops.insert(id.to_string());
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl VpnClient for ScriptedClient {
    async fn list_profiles(&self) -> Result<Vec<Profile>, VpnError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if !self.listing_delay.is_zero() {
            tokio::time::sleep(self.listing_delay).await;
        }
        let mut listings = self.listings.lock().unwrap();
        if listings.len() > 1 {
            listings.pop_front().unwrap()
        } else {
            listings.front().cloned().unwrap()
        }
    }

    async fn start(&self, id: &str, code: Option<&OtpCode>) -> Result<String, VpnError> {
        let command = match code {
            Some(code) => format!("start {} --password {}", id, code.expose()),
            None => format!("start {}", id),
        };
        self.commands.lock().unwrap().push(command);
        Ok(format!("started {}", id))
    }

    async fn stop(&self, id: &str) -> Result<String, VpnError> {
        self.commands.lock().unwrap().push(format!("stop {}", id));
        if self.failing_stops.contains(id) {
            return Err(VpnError::CommandFailed {
                command: format!("stop {}", id),
                reason: "exit status: 1: profile busy".to_string(),
            });
        }
        Ok(String::new())
    }
}

/// OTP provider returning a fixed code, or failing
pub struct StaticOtp {
    code: Result<String, AuthError>,
    calls: AtomicUsize,
}

impl StaticOtp {
    pub fn code(code: &str) -> Self {
        Self {
            code: Ok(code.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: AuthError) -> Self {
        Self {
            code: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OtpProvider for StaticOtp {
    async fn one_time_code(&self, _label: &str) -> Result<OtpCode, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.code.clone().map(OtpCode::new)
    }
}

pub fn unavailable() -> VpnError {
    VpnError::CommandFailed {
        command: "list -j".to_string(),
        reason: "exit status: 1: daemon not running".to_string(),
    }
}

pub fn profile(id: &str, name: &str, connected: bool) -> Profile {
    Profile::new(id, name, connected)
}

/// Targets modelled on a typical deployment
pub fn sample_config() -> VpnctlConfig {
    VpnctlConfig::with_targets(vec![
        TargetConfig::with_otp("dev", "sso_ackodevvpnusers", "devvpn").unwrap(),
        TargetConfig::with_otp("prod", "sso_ackoprodvpnuser", "prodvpn").unwrap(),
        TargetConfig::with_sso("drive-prod", "sso_ackodrive_prod").unwrap(),
    ])
}
