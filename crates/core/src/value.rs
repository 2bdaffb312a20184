// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dynamic, nested payload representation used for `task_data`,
//! `depends_on` entries, and `execution_info`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224};
use std::collections::BTreeMap;

/// A document-shaped value: null, bool, integer, float, string, a sequence
/// of values, or a mapping of string to value.
///
/// `#[serde(untagged)]` is load-bearing here: spec requires the on-disk
/// document to carry no type tags, and an untagged enum serializes as
/// whichever variant's inner shape it holds rather than as
/// `{"Mapping": {...}}`. `BTreeMap` gives sorted key order for free, which
/// canonical serialization depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<TaskValue>),
    Mapping(BTreeMap<String, TaskValue>),
}

impl From<bool> for TaskValue {
    fn from(v: bool) -> Self {
        TaskValue::Bool(v)
    }
}

impl From<i64> for TaskValue {
    fn from(v: i64) -> Self {
        TaskValue::Integer(v)
    }
}

impl From<f64> for TaskValue {
    fn from(v: f64) -> Self {
        TaskValue::Float(v)
    }
}

impl From<String> for TaskValue {
    fn from(v: String) -> Self {
        TaskValue::String(v)
    }
}

impl From<&str> for TaskValue {
    fn from(v: &str) -> Self {
        TaskValue::String(v.to_string())
    }
}

impl From<Vec<TaskValue>> for TaskValue {
    fn from(v: Vec<TaskValue>) -> Self {
        TaskValue::Sequence(v)
    }
}

impl From<BTreeMap<String, TaskValue>> for TaskValue {
    fn from(v: BTreeMap<String, TaskValue>) -> Self {
        TaskValue::Mapping(v)
    }
}

/// Canonical bytes for a value: stable key order (from `BTreeMap`), fixed
/// scalar style, block style. Produced by `serde_yaml`, which gives us all
/// three for free once the value tree is built from `BTreeMap`s. Identical
/// values always serialize to identical bytes regardless of the order
/// their fields were inserted in.
pub fn canonical_bytes(value: &TaskValue) -> Vec<u8> {
    serde_yaml::to_string(value).unwrap_or_default().into_bytes()
}

/// First 8 hex characters of the SHA-224 digest of `bytes` — the
/// deduplication handle used by both key and instance filenames.
pub fn short_sha224(bytes: &[u8]) -> String {
    let digest = Sha224::digest(bytes);
    let hex = format!("{digest:x}");
    hex[..8].to_string()
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
