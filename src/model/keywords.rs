//! The keyword table that drives header discovery, column resolution and footer detection.
//!
//! Bank statements name their columns differently depending on the bank and the language of the
//! export, e.g. `Ngày GD / TNX Date` or `Số tiền ghi nợ / Debit`. Matching is a case-insensitive
//! substring search, so each canonical field lists the fragments that identify it.

use crate::model::Cell;
use crate::Result;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One of the six normalized attributes every recognized statement layout must map to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    SequenceNumber,
    Date,
    Debit,
    Credit,
    Balance,
    Description,
}

serde_plain::derive_display_from_serialize!(Field);
serde_plain::derive_fromstr_from_deserialize!(Field);

impl Field {
    pub const ALL: [Field; 6] = [
        Field::SequenceNumber,
        Field::Date,
        Field::Debit,
        Field::Credit,
        Field::Balance,
        Field::Description,
    ];
}

/// Keyword variants per canonical field, the marker groups that identify the header row, and the
/// markers that identify the summary row closing the transaction table.
///
/// Serialized form, as it appears under `keywords` in `config.json`:
/// ```json
/// {
///   "columns": { "sequenceNumber": ["STT", "No."], "date": ["Ngày", "Date"], ... },
///   "header": { "sequenceNumber": ["STT", "No."], "date": ["Ngày", "Date"], ... },
///   "footer": ["Tổng số", "Total"]
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    /// Fragments used to resolve each field to a column of the header row.
    columns: BTreeMap<Field, Vec<String>>,
    /// Marker groups; a header row must match at least one fragment of every group.
    header: BTreeMap<Field, Vec<String>>,
    /// Fragments that mark the footer row, searched in the first three cells of a row.
    footer: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let columns = [
            (Field::SequenceNumber, vec!["STT", "No."]),
            (Field::Date, vec!["Ngày", "Date"]),
            (Field::Debit, vec!["ghi nợ", "Debit"]),
            (Field::Credit, vec!["ghi có", "Credit"]),
            (Field::Balance, vec!["Số dư", "Balance"]),
            (Field::Description, vec!["chi tiết", "detail"]),
        ];
        let header = [
            (Field::SequenceNumber, vec!["STT", "No."]),
            (Field::Date, vec!["Ngày", "Date"]),
            (Field::Debit, vec!["Debit", "ghi nợ"]),
            (Field::Credit, vec!["Credit"]),
        ];
        Self {
            columns: to_map(columns),
            header: to_map(header),
            footer: vec!["Tổng số".to_string(), "Total".to_string()],
        }
    }
}

fn to_map<const N: usize>(entries: [(Field, Vec<&str>); N]) -> BTreeMap<Field, Vec<String>> {
    entries
        .into_iter()
        .map(|(field, words)| (field, words.into_iter().map(String::from).collect()))
        .collect()
}

impl KeywordTable {
    /// Loads a keyword table from a standalone JSON file. Sections that are absent keep their
    /// defaults.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read keyword file at {}", path.display()))?;
        let table: KeywordTable = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse keyword file at {}", path.display()))?;
        table.validate()?;
        Ok(table)
    }

    /// Checks that every canonical field can be resolved and that header detection has something
    /// to look for.
    pub fn validate(&self) -> Result<()> {
        for field in Field::ALL {
            let words = self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[]);
            ensure!(
                words.iter().any(|w| !w.trim().is_empty()),
                "The keyword table has no column keywords for '{field}'"
            );
        }
        ensure!(
            !self.header.is_empty(),
            "The keyword table has no header marker groups"
        );
        for (field, words) in &self.header {
            ensure!(
                words.iter().any(|w| !w.trim().is_empty()),
                "The header marker group for '{field}' is empty"
            );
        }
        Ok(())
    }

    /// The column keywords for `field`.
    pub fn column_keywords(&self, field: Field) -> &[String] {
        self.columns.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn footer_markers(&self) -> &[String] {
        &self.footer
    }

    /// True when `row` has, for every header marker group, a cell matching one of its markers.
    pub fn is_header_row(&self, row: &[Cell]) -> bool {
        let texts: Vec<String> = row
            .iter()
            .filter(|c| !c.is_empty())
            .map(Cell::as_text)
            .collect();
        !texts.is_empty()
            && self
                .header
                .values()
                .all(|markers| texts.iter().any(|t| contains_any(t, markers)))
    }

    /// True when the first three cells of `row`, joined by a space, contain a footer marker.
    pub fn is_footer_row(&self, row: &[Cell]) -> bool {
        let joined = row
            .iter()
            .take(3)
            .map(Cell::as_text)
            .collect::<Vec<_>>()
            .join(" ");
        contains_any(&joined, &self.footer)
    }
}

/// Case-insensitive substring search for any of `keywords` in `text`. Blank keywords never match.
pub(crate) fn contains_any(text: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .any(|k| text.contains(&k.to_lowercase()))
}
