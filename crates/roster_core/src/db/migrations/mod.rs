//! Schema migration registry for the roster database.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Pending migrations are applied inside one transaction, and the
//!   version is bumped once after the last of them.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_kv_entries.sql"),
}];

/// Returns the newest schema version this build knows about.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to [`latest_version`] and returns the schema version
/// now in effect.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file was written by a
///   newer build.
/// - [`DbError::Sqlite`] when any migration statement fails; nothing is
///   applied in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<u32> {
    let stored = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let pending = pending_since(stored)?;
    let Some(target) = pending.last().map(|migration| migration.version) else {
        return Ok(stored);
    };

    let tx = conn.transaction()?;
    for migration in pending {
        debug!(
            "event=db_migrate module=db status=step version={}",
            migration.version
        );
        tx.execute_batch(migration.sql)?;
    }
    tx.pragma_update(None, "user_version", target)?;
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        stored,
        target,
        pending.len()
    );
    Ok(target)
}

/// Migrations newer than `stored`, in application order.
fn pending_since(stored: u32) -> DbResult<&'static [Migration]> {
    let latest = latest_version();
    if stored > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stored,
            latest_supported: latest,
        });
    }
    let applied = MIGRATIONS.partition_point(|migration| migration.version <= stored);
    Ok(&MIGRATIONS[applied..])
}
