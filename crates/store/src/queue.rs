// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The consumer-facing `Queue` handle: `put`, `get`, and the three
//! terminal-state calls a worker makes about its current task.
//!
//! A `Queue` is worker-local. It is not `Sync`: the "at most one current
//! task" discipline is enforced by `&mut self`, not by a mutex, because
//! nothing about this design is meant to be shared between threads. A
//! process that wants several concurrent workers opens several `Queue`s
//! against the same root.

use crate::dependency::{find_task_instances, try_to_unlock, UnlockOutcome};
use crate::error::QueueError;
use crate::layout::{Layout, State};
use crate::listing::list_names_by_ctime_desc;
use crate::transitions::{claim, read_task, remove_task, stash_conflict, write_task};
use fsq_core::{Clock, HostInfo, SystemClock, SystemHostInfo, Task, TaskValue};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct CurrentTask {
    name: String,
    state: State,
    task: Task,
}

/// Where a `put` landed, or where a duplicate already was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutResult {
    pub state: State,
    pub path: PathBuf,
}

pub struct Queue {
    layout: Layout,
    clock: Arc<dyn Clock>,
    host: Arc<dyn HostInfo>,
    current: Option<CurrentTask>,
}

impl Queue {
    /// Opens (and creates, if necessary) a queue rooted at `root`, using the
    /// system clock and system host info.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, QueueError> {
        Self::with_clock_and_host(root, Arc::new(SystemClock), Arc::new(SystemHostInfo))
    }

    /// Opens a queue with injected `Clock`/`HostInfo`, for deterministic
    /// tests.
    pub fn with_clock_and_host(
        root: impl Into<PathBuf>,
        clock: Arc<dyn Clock>,
        host: Arc<dyn HostInfo>,
    ) -> Result<Self, QueueError> {
        let layout = Layout::new(root);
        layout.ensure_tree()?;
        Ok(Self {
            layout,
            clock,
            host,
            current: None,
        })
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Advisory cooperative lock hook. This implementation relies entirely
    /// on the atomicity of the underlying filesystem's rename/unlink and
    /// never actually blocks; callers coordinating writers beyond what the
    /// queue itself guarantees may supply their own external lock around
    /// these calls. See SPEC_FULL.md §4.11.
    pub fn lock(&self) -> Result<(), QueueError> {
        Ok(())
    }

    pub fn unlock(&self) -> Result<(), QueueError> {
        Ok(())
    }

    /// Submits `task_data`. If a non-deleted instance with the same key
    /// already exists, returns where it lives instead of creating a
    /// duplicate; a matching locked instance is given one extra chance to
    /// unlock first.
    pub fn put(
        &self,
        task_data: TaskValue,
        submission_overrides: Option<BTreeMap<String, TaskValue>>,
        depends_on: Option<Vec<TaskValue>>,
    ) -> Result<PutResult, QueueError> {
        // Matches the original `put`: only `depends_on is None` routes to
        // `waiting/` directly. A caller-supplied empty list still routes to
        // `locked/`, same as any other list, and leaves on the next
        // `try_to_unlock` pass (which promotes a no-dependency task to
        // `waiting/` immediately, since nothing is pending).
        let mut task = Task::new(task_data, self.clock.as_ref(), self.host.as_ref());
        if let Some(overrides) = submission_overrides {
            task = task.with_submission_overrides(overrides);
        }
        if let Some(deps) = depends_on.clone() {
            task = task.with_depends_on(deps);
        }

        let key = task.key_filename();
        let instances = find_task_instances(&self.layout, &key, &State::NON_DELETED)?;
        if instances.len() > 1 {
            return Err(QueueError::InconsistentStorage(format!(
                "key {key} has {} instances across non-deleted states",
                instances.len()
            )));
        }

        if let Some((state, path)) = instances.into_iter().next() {
            if state == State::Locked {
                let name = file_name_of(&path);
                let stored = read_task(&self.layout, State::Locked, &name)?;
                return Ok(match try_to_unlock(&self.layout, &name, &stored)? {
                    UnlockOutcome::PromotedToWaiting => PutResult {
                        state: State::Waiting,
                        path: self.layout.state_dir(State::Waiting).join(&name),
                    },
                    UnlockOutcome::PromotedToFailed => PutResult {
                        state: State::Failed,
                        path: self.layout.state_dir(State::Failed).join(&name),
                    },
                    UnlockOutcome::StillLocked => PutResult { state, path },
                });
            }
            return Ok(PutResult { state, path });
        }

        let target = if depends_on.is_some() {
            State::Locked
        } else {
            State::Waiting
        };
        let name = task.instance_filename();
        write_task(&self.layout, target, &name, &task)?;

        let stored_bytes = fs::read(self.layout.state_dir(target).join(&name))?;
        let recovered = Task::deserialize(&stored_bytes).map_err(|_| QueueError::TaskStolen)?;
        if recovered.instance_filename() != name {
            stash_conflict(&self.layout, "put_original_", &name, &task.serialize()?)?;
            stash_conflict(
                &self.layout,
                "put_recovered_",
                &recovered.instance_filename(),
                &recovered.serialize()?,
            )?;
            stash_conflict(&self.layout, "put_stored_", &name, &stored_bytes)?;
            return Err(QueueError::InconsistentStorage(format!(
                "stored file {name} recomputes to {}",
                recovered.instance_filename()
            )));
        }

        Ok(PutResult {
            state: target,
            path: self.layout.state_dir(target).join(&name),
        })
    }

    /// Claims the newest waiting task. If none is waiting, runs one
    /// dependency-unlock scan and retries once before reporting `Empty`.
    pub fn get(&mut self) -> Result<Task, QueueError> {
        if self.current.is_some() {
            return Err(QueueError::CurrentTaskUnfinished);
        }

        let mut names = list_names_by_ctime_desc(&self.layout, State::Waiting)?;
        if names.is_empty() {
            self.try_all_locked()?;
            names = list_names_by_ctime_desc(&self.layout, State::Waiting)?;
            if names.is_empty() {
                return Err(QueueError::Empty);
            }
        }

        let name = names.remove(0);
        let task = read_task(&self.layout, State::Waiting, &name)?;
        if task.instance_filename() != name {
            let bytes = task.serialize()?;
            stash_conflict(&self.layout, "get_stored_", &name, &bytes)?;
            stash_conflict(&self.layout, "get_recovered_", &task.instance_filename(), &bytes)?;
            return Err(QueueError::InconsistentStorage(format!(
                "waiting file {name} recomputes to {}",
                task.instance_filename()
            )));
        }

        claim(&self.layout, &name)?;
        self.current = Some(CurrentTask {
            name: name.clone(),
            state: State::Running,
            task: task.clone(),
        });
        Ok(task)
    }

    /// Marks the current task done.
    pub fn task_done(&mut self) -> Result<(), QueueError> {
        self.transition_current(State::Done, |_| {})
    }

    /// Marks the current task failed, letting `update` record why (e.g. in
    /// `execution_info`) before it is written to `failed/`.
    pub fn task_failed<F: FnOnce(&mut Task)>(&mut self, update: F) -> Result<(), QueueError> {
        self.transition_current(State::Failed, update)
    }

    /// Moves the current task to `locked/` with the given dependencies,
    /// typically used by a worker that discovers new dependencies mid-run.
    pub fn task_locked(&mut self, depends_on: Vec<TaskValue>) -> Result<(), QueueError> {
        self.transition_current(State::Locked, move |task| {
            task.depends_on = Some(depends_on);
        })
    }

    fn transition_current(
        &mut self,
        to: State,
        mutate: impl FnOnce(&mut Task),
    ) -> Result<(), QueueError> {
        let mut current = self.current.take().ok_or(QueueError::NoCurrentTask)?;
        mutate(&mut current.task);
        write_task(&self.layout, to, &current.name, &current.task)?;
        remove_task(&self.layout, current.state, &current.name)?;
        Ok(())
    }

    /// Runs one dependency-unlock scan over `locked/` directly, without
    /// going through `get`.
    pub fn try_all_locked(&self) -> Result<Vec<(String, UnlockOutcome)>, QueueError> {
        crate::dependency::try_all_locked(&self.layout)
    }

    /// Filenames (or full paths) across `states`, newest-first within each.
    pub fn list(&self, states: &[State], full_path: bool) -> Result<Vec<PathBuf>, QueueError> {
        crate::maintenance::list(&self.layout, states, full_path)
    }

    /// A snapshot of how many tasks sit in each non-tombstone state.
    pub fn info(&self) -> Result<crate::maintenance::QueueCounts, QueueError> {
        crate::maintenance::info(&self.layout)
    }

    /// Clears `from_states`, either unlinking outright (`purge`) or moving
    /// to `deleted/` as tombstones. Returns the number of files cleared.
    pub fn wipe(&self, from_states: &[State], purge: bool) -> Result<usize, QueueError> {
        crate::maintenance::wipe(&self.layout, from_states, purge)
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
