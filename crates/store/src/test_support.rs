// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only convenience for opening a [`Queue`] against a deterministic
//! clock and host, gated behind the `test-support` feature.

use crate::error::QueueError;
use crate::layout::State;
use crate::listing::list_names_by_ctime_desc;
use crate::queue::Queue;
use fsq_core::test_support::FixedHostInfo;
use fsq_core::FakeClock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Opens a queue rooted at `root` with a [`FakeClock`] starting at
/// `seconds` and a [`FixedHostInfo`], so instance filenames and ctime
/// ordering are fully deterministic.
pub fn open_test_queue(root: impl AsRef<Path>, seconds: f64) -> Result<Queue, QueueError> {
    Queue::with_clock_and_host(
        root.as_ref(),
        Arc::new(FakeClock::new(seconds)),
        Arc::new(FixedHostInfo::default()),
    )
}

/// Every state directory's filenames, newest-first, keyed by state name.
/// A debug aid for assertions that want the whole queue's shape at once
/// rather than one `Queue::list` call per state.
pub fn queue_snapshot(queue: &Queue) -> BTreeMap<&'static str, Vec<String>> {
    let layout = queue.layout();
    let mut snapshot = BTreeMap::new();
    for state in State::ALL {
        let names = list_names_by_ctime_desc(layout, state).unwrap_or_default();
        snapshot.insert(state.dirname(), names);
    }
    snapshot
}
