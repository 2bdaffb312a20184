// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `submission_info`: a mapping with fixed keys (`time`, `utc`, `hostname`,
//! `fqdn`, `pid`) always present, plus whatever extra fields the producer
//! supplied at submission time.

use crate::clock::Clock;
use crate::host::HostInfo;
use crate::value::TaskValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const TIME: &str = "time";
const UTC: &str = "utc";
const HOSTNAME: &str = "hostname";
const FQDN: &str = "fqdn";
const PID: &str = "pid";

/// Submission metadata, fixed at submission and never updated afterwards.
///
/// Serializes transparently as the underlying sorted mapping — no wrapper
/// key — so the on-disk document matches the grammar in spec.md §6 exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionInfo(BTreeMap<String, TaskValue>);

impl SubmissionInfo {
    /// Captures the five fixed fields from `clock`/`host`. Mirrors the
    /// original `construct_submission_info`: all fields are always present,
    /// before any caller overrides are merged in.
    pub fn construct(clock: &dyn Clock, host: &dyn HostInfo) -> Self {
        let mut map = BTreeMap::new();
        map.insert(TIME.to_string(), TaskValue::Float(clock.now_unix_seconds()));
        map.insert(UTC.to_string(), TaskValue::String(clock.now_utc_string()));
        map.insert(HOSTNAME.to_string(), TaskValue::String(host.hostname()));
        map.insert(FQDN.to_string(), TaskValue::String(host.fqdn()));
        map.insert(PID.to_string(), TaskValue::Integer(i64::from(host.pid())));
        Self(map)
    }

    /// Merges caller-supplied overrides on top of the fixed fields. Producers
    /// may inject arbitrary extra fields, or override a fixed one.
    pub fn merge(&mut self, overrides: BTreeMap<String, TaskValue>) {
        self.0.extend(overrides);
    }

    /// The `time` field, or `0.0` if it was overridden away with a
    /// non-numeric value (should not happen in practice).
    pub fn time(&self) -> f64 {
        match self.0.get(TIME) {
            Some(TaskValue::Float(f)) => *f,
            Some(TaskValue::Integer(i)) => *i as f64,
            _ => 0.0,
        }
    }

    /// The `utc` field, or an empty string if it was overridden away.
    pub fn utc(&self) -> &str {
        match self.0.get(UTC) {
            Some(TaskValue::String(s)) => s.as_str(),
            _ => "",
        }
    }

    /// The full sorted mapping, as used for the instance filename subhash.
    pub fn as_map(&self) -> &BTreeMap<String, TaskValue> {
        &self.0
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
