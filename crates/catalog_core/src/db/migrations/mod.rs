//! Catalog schema steps, tracked through `PRAGMA user_version`.
//!
//! Every step is a named SQL script. `apply_migrations` runs the steps the
//! database has not seen yet inside one transaction, so a failing step leaves
//! the previous schema untouched.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

struct SchemaStep {
    version: u32,
    name: &'static str,
    script: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "products",
    script: include_str!("0001_products.sql"),
}];

/// Highest schema version this build can create.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

/// Reads the schema version recorded on the connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}

/// Brings the connection's schema up to `latest_version()`.
///
/// A database stamped with a newer version than this build knows is refused
/// instead of being touched.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = current_user_version(conn)?;
    let to_version = latest_version();
    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let mut pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .peekable();
    if pending.peek().is_none() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        from_version, to_version
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.script)
        .and_then(|()| tx.pragma_update(None, "user_version", step.version))
        .map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} step={}",
                step.version, step.name
            );
            DbError::Migration {
                version: step.version,
                source,
            }
        })
}
