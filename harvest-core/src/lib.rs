//! # harvest-core
//!
//! Domain types and configuration for the `harvest` activity collector.
//!
//! The event log's record shape and the `(login, token)` credential pair
//! live here; the sync machinery that consumes them is in `harvest-sync`.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, DataError};
pub use types::{Event, EventId, FetchPage};
