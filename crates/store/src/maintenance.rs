// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The maintenance surface: `list`, `info`, `wipe`, `watch`. None of these
//! touch a worker's current task, so they take a `Layout` directly rather
//! than a `Queue`.

use crate::error::QueueError;
use crate::layout::{Layout, State};
use crate::listing::list_names_by_ctime_desc;
use crate::transitions::move_task;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Filenames (or full paths) across `states`, newest-first within each
/// state, in the order `states` is given.
pub fn list(layout: &Layout, states: &[State], full_path: bool) -> Result<Vec<PathBuf>, QueueError> {
    let mut out = Vec::new();
    for &state in states {
        for name in list_names_by_ctime_desc(layout, state)? {
            if full_path {
                out.push(layout.state_dir(state).join(name));
            } else {
                out.push(PathBuf::from(name));
            }
        }
    }
    Ok(out)
}

/// A snapshot of how many tasks sit in each non-tombstone state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub waiting: usize,
    pub running: usize,
    pub done: usize,
    pub failed: usize,
    pub locked: usize,
}

impl QueueCounts {
    pub fn as_map(&self) -> BTreeMap<&'static str, usize> {
        let mut map = BTreeMap::new();
        map.insert("waiting", self.waiting);
        map.insert("running", self.running);
        map.insert("done", self.done);
        map.insert("failed", self.failed);
        map.insert("locked", self.locked);
        map
    }
}

pub fn info(layout: &Layout) -> Result<QueueCounts, QueueError> {
    Ok(QueueCounts {
        waiting: list_names_by_ctime_desc(layout, State::Waiting)?.len(),
        running: list_names_by_ctime_desc(layout, State::Running)?.len(),
        done: list_names_by_ctime_desc(layout, State::Done)?.len(),
        failed: list_names_by_ctime_desc(layout, State::Failed)?.len(),
        locked: list_names_by_ctime_desc(layout, State::Locked)?.len(),
    })
}

/// Clears `from_states`. With `purge`, files are unlinked outright;
/// otherwise they are moved to `deleted/` as tombstones. Returns the number
/// of files cleared.
pub fn wipe(layout: &Layout, from_states: &[State], purge: bool) -> Result<usize, QueueError> {
    let mut cleared = 0usize;
    for &state in from_states {
        for name in list_names_by_ctime_desc(layout, state)? {
            if purge {
                match fs::remove_file(layout.state_dir(state).join(&name)) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            } else {
                move_task(layout, state, State::Deleted, &name)?;
            }
            cleared += 1;
        }
    }
    Ok(cleared)
}

/// Calls `on_tick` with a fresh [`QueueCounts`] every `interval`, until
/// `should_continue` returns `false`. The original implementation prints
/// this to a log on an unconditional infinite loop; the predicate here
/// exists purely so the loop is something a test can stop.
pub fn watch(
    layout: &Layout,
    interval: Duration,
    mut should_continue: impl FnMut() -> bool,
    mut on_tick: impl FnMut(&QueueCounts),
) -> Result<(), QueueError> {
    while should_continue() {
        let counts = info(layout)?;
        tracing::info!(
            waiting = counts.waiting,
            running = counts.running,
            done = counts.done,
            failed = counts.failed,
            locked = counts.locked,
            "queue status"
        );
        on_tick(&counts);
        std::thread::sleep(interval);
    }
    Ok(())
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
