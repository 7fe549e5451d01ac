//! # harvest-sync
//!
//! Incremental event synchronizer and append-only log.
//!
//! Call [`pipeline::run`] to read the watermark from the log, pull newer
//! events from a [`PageSource`], and append them in chronological order.

pub mod error;
pub mod event_log;
pub mod pipeline;
pub mod synchronizer;

pub use error::SyncError;
pub use pipeline::SyncOutcome;
pub use synchronizer::PageSource;
