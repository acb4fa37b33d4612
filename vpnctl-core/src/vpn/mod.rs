//! VPN connection module
//!
//! Pritunl client integration, profile resolution, state reconciliation and
//! the sidecar state mirror.

pub mod client;
pub mod controller;
pub mod event;
pub mod mirror;
pub mod profile;
pub mod reconcile;
pub mod resolver;
pub mod status;

// Public re-exports
pub use client::{PritunlClient, VpnClient};
pub use controller::{ConnectOutcome, Controller, DisconnectAllReport, StopOutcome, StopReport};
pub use event::ControlEvent;
pub use mirror::StateMirror;
pub use profile::Profile;
pub use reconcile::{DesiredState, PollOutcome};
