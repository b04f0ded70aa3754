use crate::args::ImportArgs;
use crate::backup::IMPORT;
use crate::commands::{read_statement, Out};
use crate::error::{ErrorType, IntoResult};
use crate::model::TransactionRecord;
use crate::{Config, Result};
use anyhow::anyhow;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use uuid::Uuid;

/// What an import wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// The id shared by every row written in this import.
    pub batch: String,
    pub imported: u64,
    /// Requested sequence numbers that the statement does not contain.
    pub missing_ids: Vec<i64>,
    /// The JSON snapshot of the imported transactions.
    pub backup: PathBuf,
}

/// Reads the statement at `args.file()` and saves the selected transactions to the database.
///
/// - Transactions are selected by their sequence numbers, or all of them when no ids are given
/// - A JSON snapshot of the selection is written to the backups directory
/// - All rows are inserted in one database transaction and share one upload batch id
pub async fn import(config: Config, args: &ImportArgs) -> Result<Out<ImportSummary>> {
    let records = read_statement(args.file(), config.keywords()).await?;
    let (selected, missing_ids) = select(records, args.ids());
    for id in &missing_ids {
        warn!("Transaction {id} was requested but is not in the statement");
    }
    if selected.is_empty() {
        return Err(anyhow!("None of the requested transactions are in the statement"))
            .pub_result(ErrorType::Parse);
    }

    let uploaded_by = args.uploaded_by().or(config.uploader()).unwrap_or_default();
    let batch = Uuid::new_v4().to_string();

    let backup = config
        .backup()
        .save_json(IMPORT, &selected)
        .await
        .pub_result(ErrorType::Io)?;
    info!("Saved a snapshot of the import to {}", backup.display());

    let imported = config
        .db()
        .insert_transactions(&selected, uploaded_by, &batch)
        .await
        .pub_result(ErrorType::Database)?;

    Ok(Out::new(
        format!("Imported {imported} transactions from {}", args.file().display()),
        ImportSummary {
            batch,
            imported,
            missing_ids,
            backup,
        },
    ))
}

/// Keeps the records whose id is in `ids`, in statement order, and lists the ids not found.
fn select(
    records: Vec<TransactionRecord>,
    ids: Option<&[i64]>,
) -> (Vec<TransactionRecord>, Vec<i64>) {
    let Some(ids) = ids else {
        return (records, Vec::new());
    };
    let mut missing: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| !records.iter().any(|r| r.id == *id))
        .collect();
    missing.sort_unstable();
    missing.dedup();
    let selected = records
        .into_iter()
        .filter(|r| ids.contains(&r.id))
        .collect();
    (selected, missing)
}
