// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-transition primitives: the only place in the crate that touches a
//! task's bytes on disk.
//!
//! `claim` is the one operation that must be a single atomic rename — it is
//! how two workers racing for the same waiting task resolve without both
//! winning. Every other transition goes through `copy`/`move_task`/`remove`,
//! which read-then-write-then-unlink and are safe because only the worker
//! holding a task ever acts on its running/locked copy.

use crate::error::QueueError;
use crate::layout::{Layout, State};
use fsq_core::Task;
use std::fs;
use std::io;

fn not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Reads and parses the task at `state/name`. A missing file or a body that
/// fails to parse both mean a concurrent worker already moved or emptied it.
pub fn read_task(layout: &Layout, state: State, name: &str) -> Result<Task, QueueError> {
    let bytes = match fs::read(layout.state_dir(state).join(name)) {
        Ok(bytes) => bytes,
        Err(e) if not_found(&e) => return Err(QueueError::TaskStolen),
        Err(e) => return Err(e.into()),
    };
    Task::deserialize(&bytes).map_err(|_| QueueError::TaskStolen)
}

pub fn write_task(layout: &Layout, state: State, name: &str, task: &Task) -> Result<(), QueueError> {
    let bytes = task.serialize()?;
    fs::write(layout.state_dir(state).join(name), bytes)?;
    Ok(())
}

/// The authoritative claim: atomically renames `waiting/name` to
/// `running/name`. Only one of any number of racing claimants observes
/// success; the rest see `NotFound` and report `TaskStolen`.
pub fn claim(layout: &Layout, name: &str) -> Result<(), QueueError> {
    let from = layout.state_dir(State::Waiting).join(name);
    let to = layout.state_dir(State::Running).join(name);
    match fs::rename(&from, &to) {
        Ok(()) => Ok(()),
        Err(e) if not_found(&e) => Err(QueueError::TaskStolen),
        Err(e) => Err(e.into()),
    }
}

/// Reads the task at `from/name` and writes an identical copy to
/// `to/name`, leaving the source untouched.
pub fn copy_task(layout: &Layout, from: State, to: State, name: &str) -> Result<(), QueueError> {
    let task = read_task(layout, from, name)?;
    write_task(layout, to, name, &task)
}

/// Copies `from/name` to `to/name`, then unlinks the source. If the source
/// has already vanished by the time of the unlink, another worker raced this
/// same move (or a wipe) to completion first; that is logged and absorbed
/// rather than surfaced, per spec.md's fallback semantics for cross-device
/// moves.
pub fn move_task(layout: &Layout, from: State, to: State, name: &str) -> Result<(), QueueError> {
    copy_task(layout, from, to, name)?;
    match fs::remove_file(layout.state_dir(from).join(name)) {
        Ok(()) => Ok(()),
        Err(e) if not_found(&e) => {
            tracing::warn!(
                name,
                from = from.dirname(),
                to = to.dirname(),
                "source vanished during move, accepting possible duplicate at destination"
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Unlinks `state/name`. Used to clear a worker's own current task; a
/// missing file here means another process already removed it, so this
/// reports `TaskStolen` rather than absorbing the error.
pub fn remove_task(layout: &Layout, state: State, name: &str) -> Result<(), QueueError> {
    match fs::remove_file(layout.state_dir(state).join(name)) {
        Ok(()) => Ok(()),
        Err(e) if not_found(&e) => Err(QueueError::TaskStolen),
        Err(e) => Err(e.into()),
    }
}

/// Writes `bytes` into `conflict/<tag><name>`, for the self-consistency
/// diagnostics described in spec.md §6.
pub fn stash_conflict(layout: &Layout, tag: &str, name: &str, bytes: &[u8]) -> Result<(), QueueError> {
    fs::write(layout.conflict_dir().join(format!("{tag}{name}")), bytes)?;
    Ok(())
}

#[cfg(test)]
#[path = "transitions_tests.rs"]
mod tests;
