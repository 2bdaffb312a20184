// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders shared across crates. Enabled via the `test-support`
//! feature, mirroring `oj-core`'s feature of the same name.

use crate::clock::FakeClock;
use crate::host::HostInfo;
use crate::task::Task;
use crate::value::TaskValue;

/// A [`HostInfo`] with fixed values, for tests that assert on exact
/// `submission_info` contents or exact instance filenames.
#[derive(Debug, Clone)]
pub struct FixedHostInfo {
    pub hostname: String,
    pub fqdn: String,
    pub pid: u32,
}

impl Default for FixedHostInfo {
    fn default() -> Self {
        Self {
            hostname: "test-host".to_string(),
            fqdn: "test-host.example".to_string(),
            pid: 1000,
        }
    }
}

impl HostInfo for FixedHostInfo {
    fn hostname(&self) -> String {
        self.hostname.clone()
    }
    fn fqdn(&self) -> String {
        self.fqdn.clone()
    }
    fn pid(&self) -> u32 {
        self.pid
    }
}

/// Builds tasks against a fixed clock and fixed host, so tests can assert on
/// exact instance filenames and exact ctime ordering.
pub struct TaskBuilder {
    pub clock: FakeClock,
    pub host: FixedHostInfo,
}

impl TaskBuilder {
    pub fn new(seconds: f64) -> Self {
        Self {
            clock: FakeClock::new(seconds),
            host: FixedHostInfo::default(),
        }
    }

    pub fn task(&self, task_data: TaskValue) -> Task {
        Task::new(task_data, &self.clock, &self.host)
    }

    /// Advances the fake clock, useful for producing two submissions of the
    /// same `task_data` with distinct instance filenames.
    pub fn advance(&self, delta_seconds: f64) {
        self.clock.advance(delta_seconds);
    }
}
