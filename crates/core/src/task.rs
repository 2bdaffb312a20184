// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task document: the unit stored as a single file in a state
//! directory, and the two filenames derived from it.

use crate::clock::Clock;
use crate::error::CoreError;
use crate::host::HostInfo;
use crate::submission::SubmissionInfo;
use crate::time_fmt::format_submission_time;
use crate::value::{canonical_bytes, short_sha224, TaskValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One unit of work plus metadata, stored as a single file.
///
/// Field order matters: `serde_yaml` serializes structs as a mapping in
/// declaration order, so this order is exactly the on-disk key order spec.md
/// §6 requires (`submission_info`, `task_data`, `execution_info`,
/// `depends_on`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub submission_info: SubmissionInfo,
    pub task_data: TaskValue,
    #[serde(default)]
    pub execution_info: Option<TaskValue>,
    #[serde(default)]
    pub depends_on: Option<Vec<TaskValue>>,
}

impl Task {
    /// Builds a fresh task with `submission_info` captured from `clock`/`host`.
    pub fn new(task_data: TaskValue, clock: &dyn Clock, host: &dyn HostInfo) -> Self {
        Self {
            submission_info: SubmissionInfo::construct(clock, host),
            task_data,
            execution_info: None,
            depends_on: None,
        }
    }

    /// Merges caller-supplied overrides into `submission_info`.
    pub fn with_submission_overrides(mut self, overrides: BTreeMap<String, TaskValue>) -> Self {
        self.submission_info.merge(overrides);
        self
    }

    /// Attaches dependencies, marking this task as one that belongs in
    /// `locked/` rather than `waiting/`.
    pub fn with_depends_on(mut self, depends_on: Vec<TaskValue>) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    /// A task constructed purely to compute another task's key — used by the
    /// dependency engine to resolve a `depends_on` entry to a key prefix.
    pub fn for_lookup(task_data: TaskValue) -> Self {
        Self {
            submission_info: SubmissionInfo::construct(
                &crate::clock::FakeClock::new(0.0),
                &LookupHost,
            ),
            task_data,
            execution_info: None,
            depends_on: None,
        }
    }

    /// Emits the canonical document: stable key order, block style, no type
    /// tags, identical bytes on any host.
    pub fn serialize(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_yaml::to_string(self)?.into_bytes())
    }

    /// Parses a document back into a task. An empty body or a parse failure
    /// both signal that a concurrent worker emptied the file between listing
    /// and read — the caller should treat this as `TaskStolen`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::Empty);
        }
        Ok(serde_yaml::from_slice(bytes)?)
    }

    /// 8-hex-character deduplication handle derived from `task_data` alone.
    /// Two submissions with equal `task_data` share this key.
    pub fn key_filename(&self) -> String {
        short_sha224(&canonical_bytes(&self.task_data))
    }

    /// `key _ time _ utc _ subhash`, unique per enqueue. Two submissions with
    /// equal `task_data` but distinct submissions produce distinct instance
    /// filenames sharing a common key prefix.
    pub fn instance_filename(&self) -> String {
        let key = self.key_filename();
        let time = format_submission_time(self.submission_info.time());
        let utc = self.submission_info.utc();
        let submission_map = TaskValue::Mapping(self.submission_info.as_map().clone());
        let subhash = short_sha224(&canonical_bytes(&submission_map));
        format!("{key}_{time}_{utc}_{subhash}")
    }
}

/// Host used only to compute a dependency's key — submission metadata on a
/// lookup task is never written to disk or inspected.
struct LookupHost;
impl HostInfo for LookupHost {
    fn hostname(&self) -> String {
        String::new()
    }
    fn fqdn(&self) -> String {
        String::new()
    }
    fn pid(&self) -> u32 {
        0
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
