// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node-relative clock abstraction.
//!
//! Every node samples its own epoch (`Tinit`) once at startup; every event it
//! emits carries a time relative to that epoch, never a wall-clock time.
//! The `Clock` trait lets tests drive time deterministically instead of
//! sleeping real wall-clock durations.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::metric::Duration;

/// A source of monotonic time and wall-clock epoch milliseconds.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;
    fn epoch_ms(&self) -> u64;

    /// Sample a fresh node epoch from this clock.
    fn tinit(&self) -> Tinit {
        Tinit { started: self.now(), epoch_ms: self.epoch_ms() }
    }
}

#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
    }
}

/// A controllable clock for tests: `now()`/`epoch_ms()` only change when
/// `advance` is called.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    epoch_ms: Arc<Mutex<u64>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self { current: Arc::new(Mutex::new(Instant::now())), epoch_ms: Arc::new(Mutex::new(1)) }
    }

    pub fn advance(&self, duration: std::time::Duration) {
        *self.current.lock() += duration;
        *self.epoch_ms.lock() += duration.as_millis() as u64;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn epoch_ms(&self) -> u64 {
        *self.epoch_ms.lock()
    }
}

/// A node-local epoch. All event times on the wire are deltas from the
/// `started` instant captured here; `epoch_ms` is carried only so analysis
/// can order nodes' epochs relative to each other after the fact.
#[derive(Debug, Clone, Copy)]
pub struct Tinit {
    started: Instant,
    epoch_ms: u64,
}

impl Tinit {
    pub fn sample(clock: &impl Clock) -> Self {
        clock.tinit()
    }

    /// Elapsed time since this epoch, as measured by `clock`.
    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        Duration::from(clock.now().saturating_duration_since(self.started))
    }

    pub fn epoch_ms(&self) -> u64 {
        self.epoch_ms
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
