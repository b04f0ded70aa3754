//! The `bank_transactions` schema and its version bookkeeping.
//!
//! `UPGRADES[n]` takes a database from schema version `n` to `n + 1`. A new schema change is a new
//! SQL file appended to the list.

use crate::Result;
use anyhow::{bail, Context};
use sqlx::{Executor, SqlitePool};
use tracing::debug;

const UPGRADES: &[&str] = &[include_str!("v1_bank_transactions.sql")];

/// The schema version this program writes.
pub(crate) const VERSION: i32 = UPGRADES.len() as i32;

/// Creates the version table on an empty database and brings it to [`VERSION`].
pub(crate) async fn create(pool: &SqlitePool) -> Result<()> {
    pool.execute("CREATE TABLE schema_version (version INTEGER NOT NULL)")
        .await
        .context("Failed to create schema_version table")?;
    upgrade(pool, 0).await
}

/// Reads the stored schema version. A version table with no row counts as version 0.
pub(crate) async fn version(pool: &SqlitePool) -> Result<i32> {
    let row: (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .context("Failed to query schema version")?;
    Ok(row.0.unwrap_or(0))
}

/// Applies every upgrade after `from`. Each step and its version bump commit together.
pub(crate) async fn upgrade(pool: &SqlitePool, from: i32) -> Result<()> {
    if from > VERSION {
        bail!("The database schema version {from} is newer than this program supports ({VERSION})")
    }
    let pending = UPGRADES.iter().zip(1..).skip(usize::try_from(from).unwrap_or_default());
    for (sql, to) in pending {
        let mut tx = pool
            .begin()
            .await
            .context("Failed to begin the schema upgrade")?;
        tx.execute(*sql)
            .await
            .with_context(|| format!("Failed to upgrade the schema to version {to}"))?;
        sqlx::query("DELETE FROM schema_version")
            .execute(&mut *tx)
            .await
            .context("Failed to clear schema_version")?;
        sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
            .bind(to)
            .execute(&mut *tx)
            .await
            .context("Failed to update schema_version")?;
        tx.commit()
            .await
            .context("Failed to commit the schema upgrade")?;
        debug!("Database schema upgraded to version {to}");
    }
    Ok(())
}
