// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors produced while constructing or (de)serializing a [`crate::Task`].

use thiserror::Error;

/// Errors that can occur in `fsq-core` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The document had no bytes at all. Callers that read a task back from
    /// a state directory treat this the same as a parse failure: a
    /// concurrent worker emptied the file between listing and read.
    #[error("task document is empty")]
    Empty,
    /// The document could not be parsed as a task.
    #[error("failed to parse task document: {0}")]
    Parse(#[from] serde_yaml::Error),
}
