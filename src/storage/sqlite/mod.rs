//! `SQLite` storage backend.
//!
//! ## Module Structure
//!
//! - `connection`: opening, configuring and locking the shared [`rusqlite::Connection`]
//! - `sql`: LIKE escaping for user-supplied search text
//! - `entry_row`: row conversion for entries and collections
//! - `metrics`: per-operation metrics recording
//! - `store`: [`SqliteStore`], implementing both store traits

mod connection;
mod entry_row;
mod metrics;
mod sql;
mod store;

pub use connection::{acquire_lock, configure_connection, open_connection};
pub use metrics::record_operation_metrics;
pub use sql::{contains_pattern, escape_like_wildcards};
pub use store::SqliteStore;
