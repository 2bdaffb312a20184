// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Newest-first directory listings, keyed by the filesystem's ctime.
//!
//! The original implementation sorts by `os.path.getctime`, which on POSIX
//! is the inode change time, not a creation/birth time. `std::fs::Metadata`
//! only exposes a portable `created()` that targets birth time and is
//! frequently unsupported on Linux filesystems, so this module reaches past
//! it to `MetadataExt::ctime()` to match the original ordering semantics.
//! spec.md scopes this queue to a POSIX-style shared filesystem, so a
//! Unix-only listing path is in scope; non-Unix targets fall back to mtime.

use crate::error::QueueError;
use crate::layout::{Layout, State};
use std::fs;

#[cfg(unix)]
fn ctime_key(meta: &fs::Metadata) -> (i64, i64) {
    use std::os::unix::fs::MetadataExt;
    (meta.ctime(), meta.ctime_nsec())
}

#[cfg(not(unix))]
fn ctime_key(meta: &fs::Metadata) -> (i64, i64) {
    let since_epoch = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .unwrap_or_default();
    (since_epoch.as_secs() as i64, since_epoch.subsec_nanos() as i64)
}

/// Filenames in `state`, newest ctime first. Ties break on filename, which
/// for this queue's instance filenames also sorts newest-submission-first
/// within the same directory entry write.
pub fn list_names_by_ctime_desc(layout: &Layout, state: State) -> Result<Vec<String>, QueueError> {
    let dir = layout.state_dir(state);
    let mut entries = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        let name = entry.file_name().to_string_lossy().into_owned();
        entries.push((ctime_key(&meta), name));
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    Ok(entries.into_iter().map(|(_, name)| name).collect())
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
