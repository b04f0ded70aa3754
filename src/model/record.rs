use crate::model::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One transaction read from a bank statement.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// The statement's sequence number. Unique within one statement, not across uploads.
    pub id: i64,
    /// The statement date plus a synthetic seconds offset that orders same-day transactions.
    pub date: DateTime<Utc>,
    pub doc_number: String,
    pub debit: Amount,
    pub credit: Amount,
    pub balance: Amount,
    pub description: String,
}

/// A transaction as stored in the local `bank_transactions` table.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoredTransaction {
    pub id: i64,
    pub transaction_date: DateTime<Utc>,
    pub document_number: String,
    pub debit: Amount,
    pub credit: Amount,
    pub balance: Amount,
    pub description: String,
    pub uploaded_by: String,
    pub upload_batch: String,
    pub created_at: String,
}
