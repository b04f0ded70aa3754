//! Turns a bank-statement spreadsheet into an ordered list of `TransactionRecord`s.
//!
//! The statement layout is not fixed. The transaction table may be preceded by any number of
//! title rows, its columns are named in Vietnamese, English or both, and it is usually followed by
//! a summary row (`Tổng số`). The pass works like this:
//!
//! 1. The first row matching every header marker group becomes the header row.
//! 2. Each canonical field is resolved to a column of the header row.
//! 3. The first footer row below the header closes the transaction region.
//! 4. Each row of the region becomes a record unless its sequence number is zero or not a
//!    number, its date does not parse as `dd/MM/yyyy`, or neither its debit nor its credit is
//!    positive.
//!
//! The date cell may carry the document number on a second line. Transactions sharing a date are
//! given increasing seconds offsets so their timestamps stay distinct and keep the statement
//! order.

mod columns;
mod error;
mod tally;
mod workbook;

pub use columns::{find_footer, find_header, ColumnMap};
pub use error::ParseError;
pub use tally::DayTally;
pub use workbook::first_sheet;

use crate::model::{Cell, Field, KeywordTable, TransactionRecord};
use chrono::NaiveDate;
use tracing::{debug, trace};

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Normalizes a spreadsheet using the default Vietnamese/English keyword table.
pub fn normalize(bytes: &[u8]) -> Result<Vec<TransactionRecord>, ParseError> {
    normalize_with(bytes, &KeywordTable::default())
}

/// Normalizes the first sheet of the spreadsheet in `bytes`.
pub fn normalize_with(
    bytes: &[u8],
    keywords: &KeywordTable,
) -> Result<Vec<TransactionRecord>, ParseError> {
    let rows = first_sheet(bytes)?;
    normalize_rows(&rows, keywords)
}

/// Normalizes an already decoded grid of cells.
pub fn normalize_rows(
    rows: &[Vec<Cell>],
    keywords: &KeywordTable,
) -> Result<Vec<TransactionRecord>, ParseError> {
    let header_ix = find_header(rows, keywords).ok_or(ParseError::HeaderNotFound)?;
    let columns = ColumnMap::resolve(&rows[header_ix], keywords)?;
    debug!("Found the header at row {}: {columns:?}", header_ix + 1);

    let start = header_ix + 1;
    let end = find_footer(rows, start, keywords);
    debug!("Transaction rows span {}..{}", start + 1, end + 1);

    let mut tally = DayTally::new();
    let records: Vec<TransactionRecord> = rows[start..end]
        .iter()
        .enumerate()
        .filter_map(|(offset, row)| {
            let record = extract(row, &columns, &mut tally);
            if record.is_none() {
                trace!("Skipped row {}", start + offset + 1);
            }
            record
        })
        .collect();

    if records.is_empty() {
        return Err(ParseError::NoValidRows);
    }
    debug!("Normalized {} transactions", records.len());
    Ok(records)
}

/// Builds a record from one row, or returns `None` if the row is not a transaction.
fn extract(row: &[Cell], columns: &ColumnMap, tally: &mut DayTally) -> Option<TransactionRecord> {
    let id = columns.cell(row, Field::SequenceNumber).as_integer();
    if id == 0 {
        return None;
    }

    let (date, doc_number) = split_date_cell(columns.cell(row, Field::Date));
    // A dated row takes its offset even if the amount check below drops it.
    let date = tally.stamp(date?);
    let debit = columns.cell(row, Field::Debit).as_amount();
    let credit = columns.cell(row, Field::Credit).as_amount();
    if !debit.is_positive() && !credit.is_positive() {
        return None;
    }

    Some(TransactionRecord {
        id,
        date,
        doc_number,
        debit,
        credit,
        balance: columns.cell(row, Field::Balance).as_amount(),
        description: columns.cell(row, Field::Description).as_text().trim().to_string(),
    })
}

/// Splits a `date\ndocument number` cell. The date is `None` when it does not parse.
fn split_date_cell(cell: &Cell) -> (Option<NaiveDate>, String) {
    let text = cell.as_text();
    let mut parts = text.split('\n');
    let date = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());
    let doc_number = parts.next().map(str::trim).unwrap_or_default().to_string();
    (date, doc_number)
}
