//! The append-only event log.
//!
//! One JSON object per line, ascending id order, oldest first. The log is
//! the sole persistent state: the watermark is recomputed from its last
//! line on every run and never stored separately. Lines are never
//! modified, reordered, truncated, or compacted — only appended.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use harvest_core::types::{Event, EventId};

use crate::error::{data_err, io_err, SyncError};

/// Watermark of the log at `path`: the id of its last line.
///
/// Returns `EventId(0)` when the log does not exist or is empty (including
/// whitespace-only — the writer always terminates the file with `\n`, so a
/// trailing blank can only come from outside edits and is skipped rather
/// than misread as a record). A non-blank last line that is not valid JSON
/// or lacks a numeric id is a fatal data error: the watermark cannot be
/// computed safely.
pub fn watermark(path: &Path) -> Result<EventId, SyncError> {
    if !path.exists() {
        return Ok(EventId(0));
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let Some(last) = contents.lines().rev().find(|l| !l.trim().is_empty()) else {
        return Ok(EventId(0));
    };
    let event = Event::from_json_line(last)
        .map_err(|e| data_err(format!("last line of {}", path.display()), e))?;
    Ok(event.id)
}

/// Append a batch of events to the log at `path`, one line each.
///
/// The batch must already be in ascending id order. Parent directories are
/// created on demand; the file itself is created on the first append. The
/// whole batch is serialized into one buffer and written with a single
/// `write_all`, so a run appends either everything or nothing. An empty
/// batch performs no filesystem operation at all — the log's modification
/// time stays untouched.
///
/// Returns the number of lines appended.
pub fn append(path: &Path, events: &[Event]) -> Result<usize, SyncError> {
    if events.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let mut buf = String::with_capacity(events.iter().map(|e| e.raw.len() + 1).sum());
    for event in events {
        buf.push_str(&event.raw);
        buf.push('\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_err(path, e))?;
    file.write_all(buf.as_bytes()).map_err(|e| io_err(path, e))?;

    tracing::info!("appended {} events to {}", events.len(), path.display());
    Ok(events.len())
}
