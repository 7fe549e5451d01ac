//! Shared sync pipeline entrypoint.

use std::path::Path;

use crate::error::SyncError;
use crate::event_log;
use crate::synchronizer::{self, PageSource};

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Number of events appended to the log. Zero means the log was not
    /// touched at all.
    pub appended: usize,
}

/// Run one full sync: watermark from the log's last line, collect events
/// newer than it from `source`, append them in chronological order.
///
/// An empty delta performs no write whatsoever, so the log's bytes and
/// modification time survive a no-op run untouched. Any error leaves the
/// log exactly as it was before the run.
pub fn run(
    log_path: &Path,
    source: &mut dyn PageSource,
    max_pages: u32,
) -> Result<SyncOutcome, SyncError> {
    let watermark = event_log::watermark(log_path)?;
    tracing::debug!("watermark: {watermark}");

    let newer = synchronizer::collect_newer(watermark, source, max_pages)?;
    if newer.is_empty() {
        tracing::debug!("no new events; log untouched");
        return Ok(SyncOutcome { appended: 0 });
    }

    let appended = event_log::append(log_path, &newer)?;
    Ok(SyncOutcome { appended })
}
