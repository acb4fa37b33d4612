//! Progress events published by the connection controller
//!
//! The controller never prints. Callers that want progress output register
//! an observer and render these however they like.

use crate::vpn::reconcile::DesiredState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Looking up the profile identifier for a target
    Resolving { alias: String },

    /// Target resolved against the current listing
    Resolved { alias: String, id: String },

    /// Target authenticates with SSO, no code needed
    SkippingOtp { alias: String },

    /// Fetching the master password and generating a code
    GeneratingOtp { label: String },

    /// Code is ready
    OtpGenerated,

    /// Start command about to be sent
    Starting { alias: String },

    /// Stop command about to be sent
    Stopping { alias: String, id: String },

    /// Command sent, polling for the desired state
    Waiting { desired: DesiredState },

    /// The profile is listed but has not converged yet
    Pending,

    /// The client reports the desired state
    Converged { desired: DesiredState },

    /// Stop was sent but the profile still reports connected
    DisconnectTimedOut { alias: String },
}
