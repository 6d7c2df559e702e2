//! Continuous location tracker.
//!
//! Owns the one live position subscription and its permission lifecycle.
//! The latest sample is published on a `watch` channel (newest value only,
//! no history); status transitions and errors go to their own channels so
//! the presentation layer can render tracking state without polling.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, trace, warn};

use crate::domain::LocationSample;
use crate::notice::Notice;

use super::provider::{
    LocationProvider, PermissionState, PositionErrorKind, PositionUpdate, PositionWatch,
    ProviderError,
};

/// Tracker lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// The platform cannot report location.
    Unavailable,
    /// Waiting for the user to answer the permission prompt.
    Prompt,
    /// Location access denied; tracking is blocked.
    Denied,
    /// Permission granted but no subscription is open.
    Idle,
    /// A position subscription is live.
    Tracking,
}

/// Error starting the tracker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    /// Permission is denied; the user must re-enable access externally.
    #[error("location access is denied")]
    PermissionDenied,

    /// The platform has no location capability.
    #[error("location is not supported on this platform")]
    Unsupported,
}

/// Command accepted by the tracker task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    /// Open (or replace) the position subscription.
    Start,
    /// Cancel the subscription, keeping the last known sample.
    Stop,
}

/// Continuous location tracker state machine.
///
/// All mutation happens through the methods below, invoked serially by
/// [`LocationTracker::run`] or directly by tests. Exactly one subscription
/// handle is live at a time; starting again always drops the previous one
/// first.
pub struct LocationTracker<P: LocationProvider> {
    provider: Arc<P>,
    status: TrackerStatus,
    subscription: Option<PositionWatch>,
    last_error: Option<PositionErrorKind>,
    sample_tx: watch::Sender<Option<LocationSample>>,
    status_tx: watch::Sender<TrackerStatus>,
    notice_tx: mpsc::UnboundedSender<Notice>,
}

impl<P: LocationProvider> LocationTracker<P> {
    /// Create a tracker over the given provider.
    ///
    /// The initial status reflects the provider's capability and current
    /// permission state; no subscription is opened until [`start`] or an
    /// auto-start inside [`run`].
    ///
    /// [`start`]: LocationTracker::start
    /// [`run`]: LocationTracker::run
    pub fn new(provider: Arc<P>, notice_tx: mpsc::UnboundedSender<Notice>) -> Self {
        let status = if provider.is_supported() {
            match *provider.permission_states().borrow() {
                PermissionState::Granted => TrackerStatus::Idle,
                PermissionState::Prompt => TrackerStatus::Prompt,
                PermissionState::Denied => TrackerStatus::Denied,
                PermissionState::Unavailable => TrackerStatus::Unavailable,
            }
        } else {
            TrackerStatus::Unavailable
        };

        let (sample_tx, _) = watch::channel(None);
        let (status_tx, _) = watch::channel(status);

        Self {
            provider,
            status,
            subscription: None,
            last_error: None,
            sample_tx,
            status_tx,
            notice_tx,
        }
    }

    /// Latest sample stream (`None` until the first reading arrives).
    pub fn samples(&self) -> watch::Receiver<Option<LocationSample>> {
        self.sample_tx.subscribe()
    }

    /// Status transition stream.
    pub fn status_watch(&self) -> watch::Receiver<TrackerStatus> {
        self.status_tx.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> TrackerStatus {
        self.status
    }

    /// Most recent position error, cleared by the next good sample.
    pub fn last_error(&self) -> Option<PositionErrorKind> {
        self.last_error
    }

    /// Whether a subscription is currently open.
    pub fn is_tracking(&self) -> bool {
        self.subscription.is_some()
    }

    /// Open a position subscription, replacing any existing one.
    ///
    /// Fails with [`TrackerError::PermissionDenied`] while denied and
    /// [`TrackerError::Unsupported`] when the platform lacks the
    /// capability; both also raise the matching [`Notice`] and leave the
    /// tracker state unchanged.
    pub fn start(&mut self) -> Result<(), TrackerError> {
        if self.status == TrackerStatus::Denied {
            let _ = self.notice_tx.send(Notice::PermissionDenied);
            return Err(TrackerError::PermissionDenied);
        }

        if !self.provider.is_supported() {
            let _ = self.notice_tx.send(Notice::Unsupported);
            return Err(TrackerError::Unsupported);
        }

        // Cancel the outstanding handle before creating a new one.
        self.subscription = None;

        let position_watch = self.provider.watch_position().map_err(|e| match e {
            ProviderError::Unsupported => {
                let _ = self.notice_tx.send(Notice::Unsupported);
                TrackerError::Unsupported
            }
            ProviderError::PermissionDenied => {
                self.set_status(TrackerStatus::Denied);
                let _ = self.notice_tx.send(Notice::PermissionDenied);
                TrackerError::PermissionDenied
            }
        })?;

        debug!("position subscription opened");
        self.subscription = Some(position_watch);
        self.set_status(TrackerStatus::Tracking);
        Ok(())
    }

    /// Cancel the subscription. The last known sample is retained.
    pub fn stop(&mut self) {
        if self.subscription.take().is_some() {
            debug!("position subscription cancelled");
        }
        if self.status == TrackerStatus::Tracking {
            self.set_status(TrackerStatus::Idle);
        }
    }

    /// Apply one delivery from the open subscription.
    pub fn handle_update(&mut self, update: PositionUpdate) {
        match update {
            PositionUpdate::Sample(sample) => {
                trace!(point = %sample.point, "sample received");
                self.last_error = None;
                self.sample_tx.send_replace(Some(sample));
            }
            PositionUpdate::Error(kind) => self.handle_position_error(kind),
        }
    }

    /// Apply a permission transition pushed by the platform.
    ///
    /// A transition to `Granted` or `Prompt` (re)starts tracking; a
    /// transition to `Denied` latches the denied state and cancels the
    /// subscription.
    pub fn handle_permission_change(&mut self, state: PermissionState) {
        debug!(?state, "permission state changed");
        match state {
            PermissionState::Granted | PermissionState::Prompt => {
                if self.status == TrackerStatus::Denied {
                    // No longer denied; unlatch before restarting.
                    self.set_status(match state {
                        PermissionState::Granted => TrackerStatus::Idle,
                        _ => TrackerStatus::Prompt,
                    });
                }
                let _ = self.start();
            }
            PermissionState::Denied => {
                self.subscription = None;
                self.set_status(TrackerStatus::Denied);
            }
            PermissionState::Unavailable => {
                self.subscription = None;
                self.set_status(TrackerStatus::Unavailable);
            }
        }
    }

    fn handle_position_error(&mut self, kind: PositionErrorKind) {
        warn!(?kind, "position error");
        self.last_error = Some(kind);

        match kind {
            PositionErrorKind::PermissionDenied => {
                self.subscription = None;
                self.set_status(TrackerStatus::Denied);
                let _ = self.notice_tx.send(Notice::PermissionDenied);
            }
            other => {
                // Transient: surface it and keep the subscription open.
                let _ = self.notice_tx.send(Notice::Position(other));
            }
        }
    }

    fn set_status(&mut self, status: TrackerStatus) {
        if self.status != status {
            debug!(from = ?self.status, to = ?status, "tracker status");
            self.status = status;
            self.status_tx.send_replace(status);
        }
    }

    /// Drive the tracker: commands, permission transitions, and the open
    /// subscription, serialized in one task.
    ///
    /// Auto-starts if the provider's current permission state is `Granted`
    /// or `Prompt`. Exits when the command channel closes, dropping the
    /// subscription.
    pub async fn run(mut self, mut commands: mpsc::Receiver<TrackerCommand>) {
        let mut permissions = self.provider.permission_states();
        let initial = *permissions.borrow_and_update();
        self.handle_permission_change(initial);

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(TrackerCommand::Start) => {
                        let _ = self.start();
                    }
                    Some(TrackerCommand::Stop) => self.stop(),
                    None => break,
                },
                res = permissions.changed() => match res {
                    Ok(()) => {
                        let state = *permissions.borrow_and_update();
                        self.handle_permission_change(state);
                    }
                    Err(_) => break,
                },
                update = Self::next_update(&mut self.subscription) => match update {
                    Some(update) => self.handle_update(update),
                    None => {
                        // Provider closed the stream from its side.
                        self.subscription = None;
                        if self.status == TrackerStatus::Tracking {
                            self.set_status(TrackerStatus::Idle);
                        }
                    }
                },
            }
        }
    }

    async fn next_update(subscription: &mut Option<PositionWatch>) -> Option<PositionUpdate> {
        match subscription {
            Some(watch) => watch.next().await,
            None => std::future::pending().await,
        }
    }
}
