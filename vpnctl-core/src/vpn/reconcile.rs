//! State reconciliation loop
//!
//! After a start/stop command the client's own listing is the only source
//! of truth. The loop polls it at a fixed interval until the profile reports
//! the desired flag or the deadline passes. Convergence is decided by the
//! pure [`poll`] function; [`await_state`] owns timing and I/O.

use crate::error::VpnError;
use crate::vpn::client::VpnClient;
use crate::vpn::profile::Profile;
use std::time::Duration;
use tokio::time::{interval_at, sleep_until, timeout_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Connection flag a reconciliation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    Connected,
    Disconnected,
}

impl DesiredState {
    pub fn is_connected(self) -> bool {
        matches!(self, DesiredState::Connected)
    }
}

impl std::fmt::Display for DesiredState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesiredState::Connected => write!(f, "connected"),
            DesiredState::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Result of inspecting one listing snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The profile reports the desired flag
    Converged,
    /// The profile is listed but not there yet
    Pending,
    /// The profile is not in this snapshot
    Absent,
}

/// Decide convergence for one snapshot
pub fn poll(snapshot: &[Profile], id: &str, desired: DesiredState) -> PollOutcome {
    match snapshot.iter().find(|p| p.id == id) {
        Some(profile) if profile.connected == desired.is_connected() => PollOutcome::Converged,
        Some(_) => PollOutcome::Pending,
        None => PollOutcome::Absent,
    }
}

/// One wait for a profile to reach a state
#[derive(Debug, Clone, Copy)]
pub struct ReconcileRequest<'a> {
    pub id: &'a str,
    pub desired: DesiredState,
    pub timeout: Duration,
}

/// Poll the client until `request` converges or times out
///
/// The first poll happens one interval after entry. A failed or unparsable
/// listing counts as not converged. The deadline also bounds a listing
/// still in flight. `on_tick` sees every unconverged outcome and is where
/// callers hang a liveness indicator.
pub async fn await_state<C, F>(
    client: &C,
    request: ReconcileRequest<'_>,
    poll_interval: Duration,
    mut on_tick: F,
) -> Result<(), VpnError>
where
    C: VpnClient,
    F: FnMut(PollOutcome),
{
    let deadline_at = Instant::now() + request.timeout;
    let deadline = sleep_until(deadline_at);
    tokio::pin!(deadline);

    let mut ticker = interval_at(Instant::now() + poll_interval, poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut deadline => {
                return Err(timed_out(&request));
            }

            _ = ticker.tick() => {
                let snapshot = match timeout_at(deadline_at, client.list_profiles()).await {
                    Ok(Ok(profiles)) => profiles,
                    Ok(Err(e)) => {
                        debug!("Ignoring listing failure while polling: {}", e);
                        continue;
                    }
                    Err(_) => return Err(timed_out(&request)),
                };

                match poll(&snapshot, request.id, request.desired) {
                    PollOutcome::Converged => {
                        info!("Profile {} is {}", request.id, request.desired);
                        return Ok(());
                    }
                    outcome => on_tick(outcome),
                }
            }
        }
    }
}

fn timed_out(request: &ReconcileRequest<'_>) -> VpnError {
    info!(
        "Profile {} did not become {} within {:?}",
        request.id, request.desired, request.timeout
    );
    VpnError::ConnectionTimeout {
        seconds: request.timeout.as_secs(),
    }
}
