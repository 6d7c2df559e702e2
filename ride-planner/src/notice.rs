//! Notifications surfaced to the presentation layer.
//!
//! Nothing in the planning stack is a fatal fault: tracker and routing
//! failures are captured as `Notice` values on a channel, and whatever
//! renders the plan decides how to show them (the original client used
//! toasts). `PermissionDenied` and `Unsupported` are standing conditions;
//! the rest are one-shot.

use std::fmt;

use crate::routing::RouteFailure;
use crate::tracker::PositionErrorKind;

/// A notification for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Location permission is denied; tracking and start-point following
    /// are blocked until the user re-enables access externally.
    PermissionDenied,

    /// The platform has no location capability.
    Unsupported,

    /// A transient position error; tracking continues.
    Position(PositionErrorKind),

    /// Route computation failed; the displayed route was cleared.
    RoutingFailed(RouteFailure),

    /// A route lock was attempted without both endpoints set.
    LockPrecondition,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PermissionDenied => {
                write!(f, "Location access denied. Please enable location services.")
            }
            Notice::Unsupported => {
                write!(f, "Location is not supported on this platform.")
            }
            Notice::Position(kind) => match kind {
                PositionErrorKind::PermissionDenied => {
                    write!(f, "Location access denied. Please enable location services.")
                }
                PositionErrorKind::PositionUnavailable => {
                    write!(f, "Location information is unavailable.")
                }
                PositionErrorKind::Timeout => {
                    write!(f, "Location request timed out.")
                }
                PositionErrorKind::Unknown => {
                    write!(f, "An unknown location error occurred.")
                }
            },
            Notice::RoutingFailed(failure) => match failure {
                RouteFailure::NoRoute => {
                    write!(f, "Could not find a route between the points.")
                }
                RouteFailure::Network(message) => {
                    write!(f, "Network error: {message}")
                }
                RouteFailure::Service(message) => {
                    write!(f, "Routing service error: {message}")
                }
            },
            Notice::LockPrecondition => {
                write!(f, "Set both a start and a destination before locking the route.")
            }
        }
    }
}
