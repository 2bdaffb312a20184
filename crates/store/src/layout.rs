// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory layout manager: the six state directories plus the `conflict`
//! diagnostics sink, all rooted at one directory.

use crate::error::QueueError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One of the six lifecycle states a task's file can live in.
///
/// `deleted` is a tombstone directory the queue writes to but never reads
/// from for deduplication purposes (excluded from I1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Waiting,
    Running,
    Done,
    Failed,
    Locked,
    Deleted,
}

impl State {
    /// All six state directories, in the order the layout manager creates
    /// them.
    pub const ALL: [State; 6] = [
        State::Waiting,
        State::Running,
        State::Done,
        State::Failed,
        State::Locked,
        State::Deleted,
    ];

    /// States participating in key-uniqueness (I1). `deleted` is excluded.
    pub const NON_DELETED: [State; 5] = [
        State::Waiting,
        State::Running,
        State::Done,
        State::Failed,
        State::Locked,
    ];

    pub const fn dirname(self) -> &'static str {
        match self {
            State::Waiting => "waiting",
            State::Running => "running",
            State::Done => "done",
            State::Failed => "failed",
            State::Locked => "locked",
            State::Deleted => "deleted",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dirname())
    }
}

const CONFLICT_DIR: &str = "conflict";

/// Addresses the state directories beneath one root. No other component in
/// this crate builds a filesystem path by hand.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_dir(&self, state: State) -> PathBuf {
        self.root.join(state.dirname())
    }

    pub fn conflict_dir(&self) -> PathBuf {
        self.root.join(CONFLICT_DIR)
    }

    /// Creates all seven directories, idempotently. `fs::create_dir_all`
    /// already treats an existing directory as success, which is exactly
    /// the "ignore already exists" behavior the queue requires.
    pub fn ensure_tree(&self) -> Result<(), QueueError> {
        for state in State::ALL {
            fs::create_dir_all(self.state_dir(state))?;
        }
        fs::create_dir_all(self.conflict_dir())?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
