//! This module is responsible for reading, writing and managing the SQLite database

mod schema;

use crate::model::{Amount, Period, StoredTransaction, TransactionRecord};
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const COLUMNS: &str = "id, transaction_date, document_number, debit, credit, balance, \
    description, uploaded_by, upload_batch, created_at";

#[derive(Debug, Clone)]
pub(crate) struct Db {
    pool: SqlitePool,
}

impl Db {
    /// - Validates that there is a SQLite file at `path`
    /// - Opens a connection pool
    /// - Upgrades the database schema if it is out-of-date
    pub(crate) async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("The database file is missing '{}'", path.display())
        }
        let pool = connect(path, false).await?;

        schema::upgrade(&pool, schema::version(&pool).await?).await?;
        Ok(Self { pool })
    }

    /// - Validates that no file currently exists at `path`
    /// - Creates a new SQLite file at `path`
    /// - Initializes the database schema
    pub(crate) async fn init(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            bail!("A database already exists at '{}'", path.display())
        }
        let pool = connect(path, true).await?;

        schema::create(&pool).await?;
        debug!("Created database at {}", path.display());
        Ok(Self { pool })
    }

    /// Inserts `records` in a single transaction, all tagged with `uploaded_by` and `batch`.
    /// Returns the number of rows written. Either every row is written or none is.
    pub(crate) async fn insert_transactions(
        &self,
        records: &[TransactionRecord],
        uploaded_by: &str,
        batch: &str,
    ) -> Result<u64> {
        let created_at = timestamp(Utc::now());
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin the insert transaction")?;

        let mut inserted = 0;
        for record in records {
            let result = sqlx::query(
                "INSERT INTO bank_transactions (transaction_date, document_number, debit, credit, \
                 balance, description, uploaded_by, upload_batch, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(timestamp(record.date))
            .bind(&record.doc_number)
            .bind(record.debit.to_string())
            .bind(record.credit.to_string())
            .bind(record.balance.to_string())
            .bind(&record.description)
            .bind(uploaded_by)
            .bind(batch)
            .bind(&created_at)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert transaction {}", record.id))?;
            inserted += result.rows_affected();
        }

        tx.commit()
            .await
            .context("Failed to commit the insert transaction")?;
        debug!("Inserted {inserted} transactions in batch {batch}");
        Ok(inserted)
    }

    /// Returns the number of stored transactions, optionally limited to `period`.
    pub(crate) async fn count_transactions(&self, period: Option<&Period>) -> Result<u64> {
        let row: (i64,) = match period {
            None => sqlx::query_as("SELECT COUNT(*) FROM bank_transactions")
                .fetch_one(&self.pool)
                .await,
            Some(p) => {
                sqlx::query_as(
                    "SELECT COUNT(*) FROM bank_transactions \
                     WHERE transaction_date >= ? AND transaction_date < ?",
                )
                .bind(timestamp(p.start()))
                .bind(timestamp(p.end()))
                .fetch_one(&self.pool)
                .await
            }
        }
        .context("Failed to count transactions")?;
        Ok(u64::try_from(row.0).unwrap_or_default())
    }

    /// Returns one page of stored transactions, newest first. `page` counts from zero.
    pub(crate) async fn query_transactions(
        &self,
        period: Option<&Period>,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<StoredTransaction>> {
        let limit = i64::from(page_size);
        let offset = i64::from(page) * limit;
        let rows = match period {
            None => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM bank_transactions \
                     ORDER BY transaction_date DESC, id DESC LIMIT ? OFFSET ?"
                );
                sqlx::query(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
            Some(p) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM bank_transactions \
                     WHERE transaction_date >= ? AND transaction_date < ? \
                     ORDER BY transaction_date DESC, id DESC LIMIT ? OFFSET ?"
                );
                sqlx::query(&sql)
                    .bind(timestamp(p.start()))
                    .bind(timestamp(p.end()))
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to query transactions")?;

        rows.iter().map(stored_transaction).collect()
    }
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .context("Failed to parse SQLite connection string")?
        .create_if_missing(create);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database at {}", path.display()))
}

/// Dates are stored as RFC 3339 text in UTC with a fixed width, so text order is time order.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn stored_transaction(row: &SqliteRow) -> Result<StoredTransaction> {
    let text = |name: &str| -> Result<String> {
        row.try_get::<String, _>(name)
            .with_context(|| format!("Failed to read column {name}"))
    };
    let amount = |name: &str| -> Result<Amount> {
        let s = text(name)?;
        Amount::from_str(&s).with_context(|| format!("Invalid amount '{s}' in column {name}"))
    };

    let date = text("transaction_date")?;
    let transaction_date = DateTime::parse_from_rfc3339(&date)
        .with_context(|| format!("Invalid transaction_date '{date}'"))?
        .with_timezone(&Utc);

    Ok(StoredTransaction {
        id: row.try_get("id").context("Failed to read column id")?,
        transaction_date,
        document_number: text("document_number")?,
        debit: amount("debit")?,
        credit: amount("credit")?,
        balance: amount("balance")?,
        description: text("description")?,
        uploaded_by: text("uploaded_by")?,
        upload_batch: text("upload_batch")?,
        created_at: text("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn record(id: i64, day: u32, second: i64, credit: &str) -> TransactionRecord {
        let date = NaiveDate::from_ymd_opt(2023, 6, day)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
            + chrono::Duration::seconds(second);
        TransactionRecord {
            id,
            date,
            doc_number: format!("FT{id:03}"),
            debit: Amount::ZERO,
            credit: Amount::from_str(credit).unwrap(),
            balance: Amount::from_str("1000000").unwrap(),
            description: format!("Ung ho {id}"),
        }
    }

    async fn new_db() -> (TempDir, Db) {
        let dir = TempDir::new().unwrap();
        let db = Db::init(dir.path().join("saoke.sqlite")).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_init_fails_when_file_exists() {
        let (dir, _db) = new_db().await;
        assert!(Db::init(dir.path().join("saoke.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Db::load(dir.path().join("nope.sqlite")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_after_init() {
        let (dir, db) = new_db().await;
        db.insert_transactions(&[record(1, 1, 0, "500000")], "admin", "b1")
            .await
            .unwrap();
        drop(db);
        let db = Db::load(dir.path().join("saoke.sqlite")).await.unwrap();
        assert_eq!(db.count_transactions(None).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_and_query_roundtrip() {
        let (_dir, db) = new_db().await;
        let records = vec![record(1, 1, 0, "500000"), record(2, 1, 1, "1234.5")];
        let n = db.insert_transactions(&records, "admin", "b1").await.unwrap();
        assert_eq!(n, 2);

        let stored = db.query_transactions(None, 0, 10).await.unwrap();
        assert_eq!(stored.len(), 2);
        // Newest first.
        assert_eq!(stored[0].transaction_date, records[1].date);
        assert_eq!(stored[0].document_number, "FT002");
        assert_eq!(stored[0].credit, records[1].credit);
        assert_eq!(stored[0].uploaded_by, "admin");
        assert_eq!(stored[0].upload_batch, "b1");
        assert_eq!(stored[1].transaction_date, records[0].date);
    }

    #[tokio::test]
    async fn test_query_filters_by_period_and_paginates() {
        let (_dir, db) = new_db().await;
        let records: Vec<_> = (1..=5).map(|d| record(d, d as u32, 0, "100")).collect();
        db.insert_transactions(&records, "", "b1").await.unwrap();

        let from = NaiveDate::from_ymd_opt(2023, 6, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 6, 4).unwrap();
        let period = Period::days(from, to).unwrap();
        assert_eq!(db.count_transactions(Some(&period)).await.unwrap(), 3);

        let first = db.query_transactions(Some(&period), 0, 2).await.unwrap();
        let ids: Vec<_> = first.iter().map(|t| t.document_number.as_str()).collect();
        assert_eq!(ids, vec!["FT004", "FT003"]);

        let second = db.query_transactions(Some(&period), 1, 2).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].document_number, "FT002");

        let empty = db.query_transactions(Some(&period), 2, 2).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_month_boundary_is_exclusive() {
        let (_dir, db) = new_db().await;
        let mut july = record(9, 1, 0, "100");
        july.date = NaiveDate::from_ymd_opt(2023, 7, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc();
        db.insert_transactions(&[record(1, 30, 5, "100"), july], "", "b1")
            .await
            .unwrap();
        let june = Period::month(2023, 6).unwrap();
        assert_eq!(db.count_transactions(Some(&june)).await.unwrap(), 1);
        assert_eq!(db.count_transactions(None).await.unwrap(), 2);
    }

    #[test]
    fn test_timestamp_format() {
        let t = NaiveDate::from_ymd_opt(2023, 6, 1)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
            + chrono::Duration::seconds(2);
        assert_eq!(timestamp(t), "2023-06-01T00:00:02Z");
    }
}
