// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dependency engine: resolving a `depends_on` entry to a key, scanning
//! for matching instances, and deciding whether a locked task can move.

use crate::layout::{Layout, State};
use crate::listing::list_names_by_ctime_desc;
use crate::transitions::{move_task, read_task};
use crate::error::QueueError;
use fsq_core::{Task, TaskValue};
use std::path::PathBuf;

/// Where a dependency's matching instances were found and what that implies
/// for the locked task that names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DependencyState {
    Done,
    Failed,
    /// At least one instance exists in waiting/running/locked.
    Pending,
    /// No instance of this dependency exists anywhere non-deleted.
    Absent,
}

/// All `(state, path)` pairs across `states` whose filename starts with
/// `key` — the key-prefix scan used both for `put` deduplication and for
/// dependency resolution.
pub fn find_task_instances(
    layout: &Layout,
    key: &str,
    states: &[State],
) -> Result<Vec<(State, PathBuf)>, QueueError> {
    let mut found = Vec::new();
    for &state in states {
        for name in list_names_by_ctime_desc(layout, state)? {
            if name.starts_with(key) {
                found.push((state, layout.state_dir(state).join(&name)));
            }
        }
    }
    Ok(found)
}

fn dependency_state(layout: &Layout, dependency: &TaskValue) -> Result<DependencyState, QueueError> {
    let key = Task::for_lookup(dependency.clone()).key_filename();
    let instances = find_task_instances(layout, &key, &State::NON_DELETED)?;
    if instances.is_empty() {
        return Ok(DependencyState::Absent);
    }
    if instances.iter().any(|(s, _)| *s == State::Done) {
        return Ok(DependencyState::Done);
    }
    if instances.iter().any(|(s, _)| *s == State::Failed) {
        return Ok(DependencyState::Failed);
    }
    Ok(DependencyState::Pending)
}

/// What happened to a locked task after one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockOutcome {
    /// All dependencies are done (or had no instance at all): promoted to
    /// `waiting/`.
    PromotedToWaiting,
    /// At least one dependency failed: promoted to `failed/`.
    PromotedToFailed,
    /// At least one dependency is still running, waiting, or locked: left in
    /// place.
    StillLocked,
}

/// Resolves one locked task's `depends_on` list against current storage and
/// moves it if it can leave `locked/`.
///
/// Priority order, matching spec.md's table exactly: all dependencies done
/// wins first; any failed dependency wins next; otherwise, if no dependency
/// currently has a waiting/running/locked instance, the task is promoted to
/// `waiting/` (this also covers dependencies with no instance recorded at
/// all); otherwise the task stays locked.
pub fn try_to_unlock(layout: &Layout, name: &str, task: &Task) -> Result<UnlockOutcome, QueueError> {
    let deps = task.depends_on.as_deref().unwrap_or(&[]);

    let mut all_done = true;
    let mut any_failed = false;
    let mut any_pending = false;

    for dep in deps {
        match dependency_state(layout, dep)? {
            DependencyState::Done => {}
            DependencyState::Failed => {
                any_failed = true;
                all_done = false;
            }
            DependencyState::Pending => {
                any_pending = true;
                all_done = false;
            }
            DependencyState::Absent => {
                all_done = false;
            }
        }
    }

    if all_done {
        move_task(layout, State::Locked, State::Waiting, name)?;
        return Ok(UnlockOutcome::PromotedToWaiting);
    }
    if any_failed {
        move_task(layout, State::Locked, State::Failed, name)?;
        return Ok(UnlockOutcome::PromotedToFailed);
    }
    if !any_pending {
        move_task(layout, State::Locked, State::Waiting, name)?;
        return Ok(UnlockOutcome::PromotedToWaiting);
    }
    Ok(UnlockOutcome::StillLocked)
}

/// Scans every task currently in `locked/` and attempts to unlock each one.
/// A task that a racing scan (or worker) has already moved away is skipped
/// rather than treated as an error — `try_all_locked` never has a task of
/// its own to lose.
pub fn try_all_locked(layout: &Layout) -> Result<Vec<(String, UnlockOutcome)>, QueueError> {
    let mut outcomes = Vec::new();
    for name in list_names_by_ctime_desc(layout, State::Locked)? {
        let task = match read_task(layout, State::Locked, &name) {
            Ok(task) => task,
            Err(QueueError::TaskStolen) => {
                tracing::debug!(name, "locked task vanished during unlock scan, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };
        let outcome = try_to_unlock(layout, &name, &task)?;
        outcomes.push((name, outcome));
    }
    Ok(outcomes)
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
