//! A process-wide minimum spacing between geocoder calls.

use std::{
  future::Future,
  time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::info;

use crate::clock::{Clock, SystemClock};

/// Default spacing between consecutive geocoder calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// Serializes calls and keeps at least `min_interval` between them.
///
/// The lock is held for the whole call, so concurrent callers queue up
/// behind one another. The last-call instant is recorded after every
/// attempt, successful or not.
#[derive(Debug)]
pub struct RateGate<C = SystemClock> {
  clock:        C,
  min_interval: Duration,
  last_call:    Mutex<Option<Instant>>,
}

impl RateGate<SystemClock> {
  pub fn new(min_interval: Duration) -> Self { Self::with_clock(SystemClock, min_interval) }
}

impl Default for RateGate<SystemClock> {
  fn default() -> Self { Self::new(DEFAULT_MIN_INTERVAL) }
}

impl<C: Clock> RateGate<C> {
  pub fn with_clock(clock: C, min_interval: Duration) -> Self {
    Self { clock, min_interval, last_call: Mutex::new(None) }
  }

  pub fn min_interval(&self) -> Duration { self.min_interval }

  pub fn clock(&self) -> &C { &self.clock }

  /// Wait out the remaining spacing, then run `call`.
  pub async fn run<F, Fut, T>(&self, call: F) -> T
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
  {
    let mut last_call = self.last_call.lock().await;

    if let Some(previous) = *last_call {
      let elapsed = self.clock.now().saturating_duration_since(previous);
      if let Some(wait) = self.min_interval.checked_sub(elapsed)
        && !wait.is_zero()
      {
        info!(wait_ms = wait.as_millis() as u64, "waiting before next geocoder call");
        self.clock.sleep(wait).await;
      }
    }

    let output = call().await;
    *last_call = Some(self.clock.now());
    output
  }
}
