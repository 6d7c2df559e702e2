//! Scripted location provider for tests and development.
//!
//! Mirrors the real provider interface; samples, errors, and permission
//! transitions are pushed by the caller instead of a platform.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};

use crate::domain::LocationSample;

use super::provider::{
    LocationProvider, PermissionState, PositionErrorKind, PositionUpdate, PositionWatch,
    ProviderError,
};

/// Buffered updates per subscription; pushes beyond this are dropped,
/// which no test should ever reach.
const UPDATE_BUFFER: usize = 32;

/// Scripted [`LocationProvider`].
#[derive(Clone)]
pub struct MockLocationProvider {
    inner: Arc<Inner>,
}

struct Inner {
    supported: bool,
    permission_tx: watch::Sender<PermissionState>,
    subscription_tx: Mutex<Option<mpsc::Sender<PositionUpdate>>>,
    open_count: AtomicUsize,
}

impl MockLocationProvider {
    /// Create a provider with a fixed capability and an initial
    /// permission state.
    pub fn new(supported: bool, permission: PermissionState) -> Self {
        let (permission_tx, _) = watch::channel(permission);
        Self {
            inner: Arc::new(Inner {
                supported,
                permission_tx,
                subscription_tx: Mutex::new(None),
                open_count: AtomicUsize::new(0),
            }),
        }
    }

    /// Push a permission transition, as a platform notification would.
    pub fn set_permission(&self, state: PermissionState) {
        self.inner.permission_tx.send_replace(state);
    }

    /// Deliver a sample over the current subscription, if one is open.
    pub fn push_sample(&self, sample: LocationSample) {
        self.push(PositionUpdate::Sample(sample));
    }

    /// Deliver a classified error over the current subscription.
    pub fn push_error(&self, kind: PositionErrorKind) {
        self.push(PositionUpdate::Error(kind));
    }

    /// How many subscriptions have been opened in total.
    pub fn open_count(&self) -> usize {
        self.inner.open_count.load(Ordering::SeqCst)
    }

    /// Whether the most recently opened subscription is still alive.
    pub fn subscription_open(&self) -> bool {
        self.inner
            .subscription_tx
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    fn push(&self, update: PositionUpdate) {
        let guard = self.inner.subscription_tx.lock().unwrap();
        if let Some(tx) = guard.as_ref() {
            let _ = tx.try_send(update);
        }
    }
}

impl LocationProvider for MockLocationProvider {
    fn is_supported(&self) -> bool {
        self.inner.supported
    }

    fn permission_states(&self) -> watch::Receiver<PermissionState> {
        self.inner.permission_tx.subscribe()
    }

    fn watch_position(&self) -> Result<PositionWatch, ProviderError> {
        if !self.inner.supported {
            return Err(ProviderError::Unsupported);
        }

        let (tx, rx) = mpsc::channel(UPDATE_BUFFER);
        *self.inner.subscription_tx.lock().unwrap() = Some(tx);
        self.inner.open_count.fetch_add(1, Ordering::SeqCst);
        Ok(PositionWatch::new(rx))
    }
}
