//! Platform location provider contract.
//!
//! The tracker never talks to a platform API directly; it sees this trait.
//! Implementations wrap whatever the target actually offers (a browser
//! geolocation bridge, a mobile shim, a replay source).

use tokio::sync::{mpsc, watch};

use crate::domain::LocationSample;

/// Permission lifecycle state reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The user has not been asked yet.
    Prompt,
    /// Location access is granted.
    Granted,
    /// Location access is denied.
    Denied,
    /// The platform cannot report permission state at all.
    Unavailable,
}

/// Classification of an error delivered over a position subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionErrorKind {
    /// The user revoked or refused location access.
    PermissionDenied,
    /// The platform could not determine a position.
    PositionUnavailable,
    /// The position request timed out.
    Timeout,
    /// Anything the platform did not classify.
    Unknown,
}

/// One delivery from an open position subscription.
#[derive(Debug, Clone)]
pub enum PositionUpdate {
    /// A fresh position reading.
    Sample(LocationSample),
    /// A classified platform error.
    Error(PositionErrorKind),
}

/// Error opening a position subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The platform has no location capability.
    #[error("location is not supported on this platform")]
    Unsupported,

    /// The platform refused to open a subscription.
    #[error("location access is denied")]
    PermissionDenied,
}

/// Handle to an open position subscription.
///
/// Exactly one subscription is live at a time; dropping the handle cancels
/// it (the provider observes its channel closing). Replacing a
/// subscription therefore always means dropping the old handle first.
#[derive(Debug)]
pub struct PositionWatch {
    updates: mpsc::Receiver<PositionUpdate>,
}

impl PositionWatch {
    /// Wrap a provider's update channel.
    pub fn new(updates: mpsc::Receiver<PositionUpdate>) -> Self {
        Self { updates }
    }

    /// Next update, or `None` once the provider closes the subscription.
    pub async fn next(&mut self) -> Option<PositionUpdate> {
        self.updates.recv().await
    }
}

/// Platform boundary for continuous location acquisition.
pub trait LocationProvider: Send + Sync + 'static {
    /// Whether the platform can report location at all.
    fn is_supported(&self) -> bool;

    /// Current permission state plus all subsequent transitions.
    fn permission_states(&self) -> watch::Receiver<PermissionState>;

    /// Open a continuous position subscription.
    fn watch_position(&self) -> Result<PositionWatch, ProviderError>;
}
