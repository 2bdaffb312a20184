// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors the queue's operations surface to a caller.
///
/// `TaskStolen` and `InconsistentStorage` are both storage-level signals
/// rather than bugs: they tell a caller that the shared filesystem disagreed
/// with what this process expected to find there, and why.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("no waiting task is available")]
    Empty,

    #[error("this worker already holds an unfinished current task")]
    CurrentTaskUnfinished,

    #[error("no current task to finalize")]
    NoCurrentTask,

    #[error("the current task was claimed or removed by another worker")]
    TaskStolen,

    #[error("storage inconsistency: {0}")]
    InconsistentStorage(String),

    #[error(transparent)]
    Core(#[from] fsq_core::CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
