//! Renders transactions in the output format picked on the command line.

use crate::args::OutputFormat;
use crate::model::{StoredTransaction, TransactionRecord};
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of objects, one per transaction.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Rows {
    pub fn render<T: Tabular + Serialize>(items: &[T], format: OutputFormat) -> Result<Self> {
        Ok(match format {
            OutputFormat::Json => {
                Rows::Json(serde_json::to_value(items).context("Unable to serialize rows")?)
            }
            OutputFormat::Table => Rows::Table(to_markdown(items)),
            OutputFormat::Csv => Rows::Csv(to_csv(items)?),
        })
    }
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

/// Something that can be shown as one line of a table.
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

impl Tabular for TransactionRecord {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "date",
            "doc_number",
            "debit",
            "credit",
            "balance",
            "description",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.doc_number.clone(),
            self.debit.to_string(),
            self.credit.to_string(),
            self.balance.to_string(),
            self.description.clone(),
        ]
    }
}

impl Tabular for StoredTransaction {
    fn headers() -> &'static [&'static str] {
        &[
            "id",
            "transaction_date",
            "document_number",
            "debit",
            "credit",
            "balance",
            "description",
            "uploaded_by",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.transaction_date
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            self.document_number.clone(),
            self.debit.to_string(),
            self.credit.to_string(),
            self.balance.to_string(),
            self.description.clone(),
            self.uploaded_by.clone(),
        ]
    }
}

fn to_markdown<T: Tabular>(items: &[T]) -> String {
    let escape = |s: &str| s.replace('|', "\\|").replace('\n', " ");
    let mut out = String::new();
    out.push_str(&format!("| {} |\n", T::headers().join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        T::headers().iter().map(|_| " --- |").collect::<String>()
    ));
    for item in items {
        let cells: Vec<String> = item.cells().iter().map(|c| escape(c.as_str())).collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

fn to_csv<T: Tabular>(items: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(T::headers())
        .context("Unable to write the CSV header")?;
    for item in items {
        writer
            .write_record(item.cells())
            .context("Unable to write a CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish the CSV output: {e}"))?;
    String::from_utf8(bytes).context("The CSV output is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use chrono::{NaiveDate, NaiveTime};
    use std::str::FromStr;

    fn record() -> TransactionRecord {
        TransactionRecord {
            id: 3,
            date: NaiveDate::from_ymd_opt(2023, 6, 1)
                .unwrap()
                .and_time(NaiveTime::MIN)
                .and_utc()
                + chrono::Duration::seconds(2),
            doc_number: "FT23152003".to_string(),
            debit: Amount::from_str("300,000").unwrap(),
            credit: Amount::ZERO,
            balance: Amount::from_str("2,200,000").unwrap(),
            description: "Chi ho tro, dot | 1".to_string(),
        }
    }

    #[test]
    fn test_table() {
        let rows = Rows::render(&[record()], OutputFormat::Table).unwrap();
        let text = rows.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("| id | date |"));
        assert!(lines[2].contains("| 2023-06-01 00:00:02 | FT23152003 | 300000 | 0 |"));
        assert!(lines[2].contains("dot \\| 1"));
    }

    #[test]
    fn test_csv_quotes_commas() {
        let rows = Rows::render(&[record()], OutputFormat::Csv).unwrap();
        let text = rows.to_string();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,doc_number,debit,credit,balance,description"
        );
        assert_eq!(
            lines.next().unwrap(),
            "3,2023-06-01 00:00:02,FT23152003,300000,0,2200000,\"Chi ho tro, dot | 1\""
        );
    }

    #[test]
    fn test_json_uses_camel_case() {
        let rows = Rows::render(&[record()], OutputFormat::Json).unwrap();
        match rows {
            Rows::Json(v) => {
                assert_eq!(v[0]["docNumber"], "FT23152003");
                assert_eq!(v[0]["debit"], "300000");
            }
            other => panic!("expected json, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_has_header() {
        let rows = Rows::render::<TransactionRecord>(&[], OutputFormat::Table).unwrap();
        assert_eq!(rows.to_string().lines().count(), 2);
    }
}
