// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! A filesystem-backed task queue: no broker, no daemon — just state
//! directories on a POSIX-style shared filesystem and the atomic rename/
//! unlink primitives it offers.

mod dependency;
mod error;
mod layout;
mod listing;
mod maintenance;
mod queue;
mod transitions;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use dependency::UnlockOutcome;
pub use error::QueueError;
pub use layout::{Layout, State};
pub use maintenance::{info, list, watch, wipe, QueueCounts};
pub use queue::{PutResult, Queue};
