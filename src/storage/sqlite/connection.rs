//! Connection handling for the `SQLite` store.
//!
//! Opening, configuring, and locking the single shared connection.

use crate::{Error, Result};
use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Acquires a mutex lock, recovering from poison.
///
/// A panic inside a previous critical section poisons the mutex. The
/// connection itself is still usable, so the inner value is recovered and a
/// warning is logged instead of failing every later store call.
pub fn acquire_lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("SQLite mutex was poisoned, recovering");
            metrics::counter!("sqlite_mutex_poison_recovery_total").increment(1);
            poisoned.into_inner()
        },
    }
}

/// Opens a file-backed connection, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the directory or database cannot be created.
pub fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::operation("create_db_dir", e))?;
    }
    Connection::open(path).map_err(|e| Error::operation("open_sqlite", e))
}

/// SQL name of the Unicode-aware lowercase function.
pub const UNICODE_LOWER: &str = "unicode_lower";

/// Configures a connection for concurrent access.
///
/// - **WAL mode**: concurrent readers with a single writer
/// - **NORMAL synchronous**: balances durability with performance
/// - **`busy_timeout`**: waits up to 5 seconds on lock contention
/// - **`foreign_keys`**: entries cannot outlive their collection
/// - **`unicode_lower(text)`**: lowercases with full Unicode rules, unlike
///   the built-in `lower` and `LIKE`, which only fold ASCII
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if foreign key enforcement cannot be
/// enabled or the function cannot be registered.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    // journal_mode returns a row, so pragma_update's result is ignored here.
    let _ = conn.pragma_update(None, "journal_mode", "WAL");
    let _ = conn.pragma_update(None, "synchronous", "NORMAL");
    let _ = conn.pragma_update(None, "busy_timeout", "5000");
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| Error::operation("enable_foreign_keys", e))?;

    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )
    .map_err(|e| Error::operation("register_unicode_lower", e))
}
