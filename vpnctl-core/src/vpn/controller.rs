//! Connection controller
//!
//! Orchestrates one top-level operation: resolve the target, obtain a code
//! when the target needs one, send the start/stop command, wait for the
//! client to report the new state, and refresh the state mirror.

use crate::auth::OtpProvider;
use crate::config::{AuthMode, TargetConfig, VpnctlConfig};
use crate::error::{VpnError, VpnctlError};
use crate::vpn::client::VpnClient;
use crate::vpn::event::ControlEvent;
use crate::vpn::mirror::StateMirror;
use crate::vpn::reconcile::{await_state, DesiredState, PollOutcome, ReconcileRequest};
use crate::vpn::resolver::resolve_target;
use crate::vpn::status::{status_entries, StatusEntry};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Successful connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub alias: String,
    pub id: String,
    /// Whatever the client printed for the start command
    pub output: String,
}

/// A stop command that was sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopReport {
    pub alias: String,
    pub id: String,
    /// The profile still reported connected when the wait ended
    pub timed_out: bool,
}

/// Per-target result of a best-effort stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped(StopReport),
    /// No imported profile matched the target
    NotImported,
}

/// Aggregated result of `disconnect all`, in configuration order
#[derive(Debug, Default)]
pub struct DisconnectAllReport {
    pub results: Vec<(String, Result<StopOutcome, VpnctlError>)>,
}

impl DisconnectAllReport {
    pub fn stopped(&self) -> impl Iterator<Item = &StopReport> {
        self.results.iter().filter_map(|(_, result)| match result {
            Ok(StopOutcome::Stopped(report)) => Some(report),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &VpnctlError)> {
        self.results
            .iter()
            .filter_map(|(alias, result)| result.as_ref().err().map(|e| (alias.as_str(), e)))
    }
}

type Observer = Box<dyn Fn(&ControlEvent)>;

/// Drives connect/disconnect operations against a VPN client
pub struct Controller<C, O> {
    config: VpnctlConfig,
    client: C,
    otp: O,
    mirror: StateMirror,
    observer: Option<Observer>,
}

impl<C: VpnClient, O: OtpProvider> Controller<C, O> {
    pub fn new(config: VpnctlConfig, client: C, otp: O, mirror: StateMirror) -> Self {
        Self {
            config,
            client,
            otp,
            mirror,
            observer: None,
        }
    }

    /// Receive progress events for non-silent operations
    pub fn with_observer(mut self, observer: impl Fn(&ControlEvent) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn mirror(&self) -> &StateMirror {
        &self.mirror
    }

    fn emit(&self, event: ControlEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Connect a configured target and wait until the client reports it up
    ///
    /// A timeout is an error: the start command was sent but the outcome is
    /// unknown. The state mirror is only refreshed on success.
    pub async fn connect(&self, alias: &str) -> Result<ConnectOutcome, VpnctlError> {
        let target = self.config.target(alias)?;

        self.emit(ControlEvent::Resolving {
            alias: alias.to_string(),
        });
        let id = resolve_target(&self.client, target).await?;
        self.emit(ControlEvent::Resolved {
            alias: alias.to_string(),
            id: id.clone(),
        });

        let code = match target.auth_mode() {
            AuthMode::Sso => {
                self.emit(ControlEvent::SkippingOtp {
                    alias: alias.to_string(),
                });
                None
            }
            AuthMode::Otp { label } => {
                self.emit(ControlEvent::GeneratingOtp {
                    label: label.to_string(),
                });
                let code = self.otp.one_time_code(label).await?;
                self.emit(ControlEvent::OtpGenerated);
                Some(code)
            }
        };

        self.emit(ControlEvent::Starting {
            alias: alias.to_string(),
        });
        let output = self.client.start(&id, code.as_ref()).await?;
        info!("Start command sent for {} ({})", alias, id);

        self.wait_for(&id, DesiredState::Connected, self.config.timeouts.connect(), false)
            .await?;

        self.mirror.refresh(&self.client, &self.config).await;

        Ok(ConnectOutcome {
            alias: alias.to_string(),
            id,
            output,
        })
    }

    /// Disconnect a configured target
    ///
    /// A timeout while waiting is only a warning: the stop command was
    /// already sent.
    pub async fn disconnect(&self, alias: &str) -> Result<StopReport, VpnctlError> {
        let target = self.config.target(alias)?;

        let report = match self.stop_target(target, false).await? {
            StopOutcome::Stopped(report) => report,
            // Only silent stops swallow resolution failures
            StopOutcome::NotImported => {
                return Err(VpnError::ProfileNotFound {
                    pattern: target.pattern.as_str().to_string(),
                }
                .into())
            }
        };

        self.mirror.refresh(&self.client, &self.config).await;
        Ok(report)
    }

    /// Stop every configured target, best-effort
    ///
    /// Targets without an imported profile are skipped, individual failures
    /// are collected, and the mirror is refreshed once at the end.
    pub async fn disconnect_all(&self) -> DisconnectAllReport {
        let mut report = DisconnectAllReport::default();

        for target in &self.config.targets {
            let result = self.stop_target(target, true).await;
            if let Err(e) = &result {
                warn!("Failed to stop {}: {}", target.alias, e);
            }
            report.results.push((target.alias.clone(), result));
        }

        self.mirror.refresh(&self.client, &self.config).await;
        report
    }

    /// Dashboard rows for the current listing
    pub async fn status(&self) -> Result<Vec<StatusEntry>, VpnError> {
        let profiles = self.client.list_profiles().await?;
        Ok(status_entries(&profiles, &self.config.status))
    }

    async fn stop_target(&self, target: &TargetConfig, silent: bool) -> Result<StopOutcome, VpnctlError> {
        if !silent {
            self.emit(ControlEvent::Resolving {
                alias: target.alias.clone(),
            });
        }

        let id = match resolve_target(&self.client, target).await {
            Ok(id) => id,
            Err(e) if silent => {
                debug!("Skipping {}: {}", target.alias, e);
                return Ok(StopOutcome::NotImported);
            }
            Err(e) => return Err(e.into()),
        };

        if !silent {
            self.emit(ControlEvent::Stopping {
                alias: target.alias.clone(),
                id: id.clone(),
            });
        }

        self.client.stop(&id).await?;
        info!("Stop command sent for {} ({})", target.alias, id);

        let timed_out = match self
            .wait_for(&id, DesiredState::Disconnected, self.config.timeouts.disconnect(), silent)
            .await
        {
            Ok(()) => false,
            Err(e) => {
                warn!("{} may still be connected: {}", target.alias, e);
                if !silent {
                    self.emit(ControlEvent::DisconnectTimedOut {
                        alias: target.alias.clone(),
                    });
                }
                true
            }
        };

        Ok(StopOutcome::Stopped(StopReport {
            alias: target.alias.clone(),
            id,
            timed_out,
        }))
    }

    async fn wait_for(
        &self,
        id: &str,
        desired: DesiredState,
        timeout: Duration,
        silent: bool,
    ) -> Result<(), VpnError> {
        if !silent {
            self.emit(ControlEvent::Waiting { desired });
        }

        let request = ReconcileRequest { id, desired, timeout };
        await_state(&self.client, request, self.config.timeouts.poll_interval(), |outcome| {
            if outcome == PollOutcome::Pending && !silent {
                self.emit(ControlEvent::Pending);
            }
        })
        .await?;

        if !silent {
            self.emit(ControlEvent::Converged { desired });
        }
        Ok(())
    }
}
