//! Schema versioning
//!
//! The applied version lives in SQLite's `user_version` pragma; each step
//! runs in its own transaction and bumps it.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

pub struct Migration {
    /// Sequential, starting from 1
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "Key-value settings",
    sql: "CREATE TABLE IF NOT EXISTS settings (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL,
              updated_at TEXT NOT NULL
          );",
}];

/// Applied schema version, 0 on a fresh database
pub(crate) fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Bring the schema up to date
#[instrument(skip(conn))]
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let applied = schema_version(conn)?;

    for step in MIGRATIONS.iter().skip_while(|m| m.version <= applied) {
        info!(version = step.version, description = step.description, "Migrating schema");
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
    }

    Ok(())
}
