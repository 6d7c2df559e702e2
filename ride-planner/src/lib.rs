//! Client-side route planning for a live-position navigation app.
//!
//! Answers: "from where I am right now, how do I get to the point I just
//! picked on the map?" The crate owns the route-planning state machine:
//! location acquisition with permission handling, throttling of noisy
//! position updates, start/destination selection with lock semantics, and
//! asynchronous route computation against an OSRM-compatible service. It
//! publishes plan snapshots and notifications for a presentation layer to
//! render; map drawing itself is out of scope.

pub mod domain;
pub mod notice;
pub mod planner;
pub mod routing;
pub mod session;
pub mod throttle;
pub mod tracker;
