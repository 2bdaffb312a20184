// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time source abstraction.
//!
//! Submission timestamps feed directly into the instance filename, so tests
//! that assert on exact filenames or on ctime-ordering need a clock they can
//! pin and advance, not the real wall clock.

use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current time, injected into [`crate::Task`] construction.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch, matching Python's `time.time()`.
    fn now_unix_seconds(&self) -> f64;
    /// `YYYYMMDD-HHMMSS` in UTC, matching `time.strftime("%Y%m%d-%H%M%S")`.
    fn now_utc_string(&self) -> String;
}

/// Production clock backed by the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
    }

    fn now_utc_string(&self) -> String {
        Utc::now().format("%Y%m%d-%H%M%S").to_string()
    }
}

/// Deterministic clock for tests. Starts at a fixed time and only moves when
/// [`FakeClock::advance`] is called.
#[derive(Debug)]
pub struct FakeClock {
    seconds: Mutex<f64>,
}

impl FakeClock {
    pub fn new(seconds: f64) -> Self {
        Self {
            seconds: Mutex::new(seconds),
        }
    }

    /// Moves the clock forward by `delta_seconds` (may be negative).
    pub fn advance(&self, delta_seconds: f64) {
        let mut guard = self.seconds.lock().unwrap_or_else(|poison| poison.into_inner());
        *guard += delta_seconds;
    }
}

impl Clock for FakeClock {
    fn now_unix_seconds(&self) -> f64 {
        *self.seconds.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    fn now_utc_string(&self) -> String {
        let secs = self.now_unix_seconds();
        DateTime::<Utc>::from_timestamp(secs as i64, 0)
            .unwrap_or_default()
            .format("%Y%m%d-%H%M%S")
            .to_string()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
