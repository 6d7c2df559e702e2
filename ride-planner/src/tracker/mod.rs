//! Location acquisition: provider boundary and the tracker state machine.

mod mock;
mod provider;
mod tracker;

pub use mock::MockLocationProvider;
pub use provider::{
    LocationProvider, PermissionState, PositionErrorKind, PositionUpdate, PositionWatch,
    ProviderError,
};
pub use tracker::{LocationTracker, TrackerCommand, TrackerError, TrackerStatus};
