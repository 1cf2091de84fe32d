//! Time source for the rate gate, replaceable in tests.

use std::{
  future::Future,
  time::{Duration, Instant},
};

pub trait Clock: Send + Sync {
  fn now(&self) -> Instant;

  fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send + '_;
}

/// Wall-clock time backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant { Instant::now() }

  async fn sleep(&self, duration: Duration) { tokio::time::sleep(duration).await }
}
