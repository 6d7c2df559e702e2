//! Trailing-edge throttle for the location stream.
//!
//! Raw trackers can emit several samples per second; downstream consumers
//! (route recomputation in particular) want one value per quiet period.
//! The contract:
//!
//! - the first-ever sample is passed through immediately;
//! - every later sample (re)arms a single timer instead of emitting;
//! - when the timer elapses, the most recent sample is emitted;
//! - an empty input (`None`) never emits and never touches the timer.
//!
//! Bursts therefore collapse to their last value, one emission per quiet
//! interval. The timer is a single `Sleep` that is reset in place; the
//! old deadline is cancelled before the new one is armed.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use crate::domain::LocationSample;

/// Default quiet period between emissions.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Trailing-edge rate limiter over a `watch` stream of samples.
#[derive(Debug, Clone)]
pub struct LocationThrottle {
    interval: Duration,
}

impl Default for LocationThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl LocationThrottle {
    /// Create a throttle with the given quiet period.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// The configured quiet period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the throttle task over `raw`, returning the limited stream.
    ///
    /// The task exits when the input sender or every output receiver is
    /// dropped.
    pub fn spawn(
        self,
        raw: watch::Receiver<Option<LocationSample>>,
    ) -> watch::Receiver<Option<LocationSample>> {
        let (tx, rx) = watch::channel(None);
        tokio::spawn(self.run(raw, tx));
        rx
    }

    async fn run(
        self,
        mut raw: watch::Receiver<Option<LocationSample>>,
        tx: watch::Sender<Option<LocationSample>>,
    ) {
        let timer = tokio::time::sleep(Duration::ZERO);
        tokio::pin!(timer);
        let mut armed = false;
        let mut pending: Option<LocationSample> = None;
        let mut emitted_first = false;

        // A sample may already be latched in the channel at subscribe time;
        // it counts as the immediate first emission.
        if let Some(sample) = *raw.borrow_and_update() {
            emitted_first = true;
            tx.send_replace(Some(sample));
        }

        loop {
            tokio::select! {
                res = raw.changed() => {
                    if res.is_err() {
                        break;
                    }
                    let Some(sample) = *raw.borrow_and_update() else {
                        // No data: never emits, never perturbs the timer.
                        continue;
                    };

                    if !emitted_first {
                        emitted_first = true;
                        trace!(point = %sample.point, "first sample passed through");
                        tx.send_replace(Some(sample));
                    } else {
                        pending = Some(sample);
                        timer.as_mut().reset(Instant::now() + self.interval);
                        armed = true;
                    }
                }
                () = &mut timer, if armed => {
                    armed = false;
                    if let Some(sample) = pending.take() {
                        trace!(point = %sample.point, "quiet period elapsed");
                        tx.send_replace(Some(sample));
                    }
                }
                () = tx.closed() => break,
            }
        }
    }
}
