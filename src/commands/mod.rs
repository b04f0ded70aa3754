//! Command handlers for the saoke CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod history;
mod import;
mod init;
mod parse;
mod rows;
mod template;

use crate::error::{ErrorType, IntoResult};
use crate::model::{KeywordTable, TransactionRecord};
use crate::normalize::normalize_with;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use history::{history, History};
pub use import::{import, ImportSummary};
pub use init::init;
pub use parse::parse;
pub use rows::{Rows, Tabular};
pub use template::template;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

impl Out<Rows> {
    /// Print the message to `info!` and the rows to stdout.
    pub fn print_rows(&self) {
        info!("{}", self.message);
        if let Some(rows) = self.structure() {
            println!("{rows}");
        }
    }
}

impl Out<History> {
    /// Print the message to `info!` and the page of rows to stdout.
    pub fn print_rows(&self) {
        info!("{}", self.message);
        if let Some(history) = self.structure() {
            println!("{}", history.rows);
        }
    }
}

/// Reads and normalizes the statement at `file`.
pub(crate) async fn read_statement(
    file: &Path,
    keywords: &KeywordTable,
) -> Result<Vec<TransactionRecord>> {
    check_extension(file).pub_result(ErrorType::Parse)?;
    let bytes = utils::read_bytes(file).await.pub_result(ErrorType::Io)?;
    normalize_with(&bytes, keywords)
        .with_context(|| format!("Unable to read the statement {}", file.display()))
        .pub_result(ErrorType::Parse)
}

/// Only Excel workbooks are accepted, whatever the case of the extension.
fn check_extension(file: &Path) -> Result<()> {
    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") | Some("xls") => Ok(()),
        _ => bail!(
            "Only .xlsx and .xls files are supported, got '{}'",
            file.display()
        ),
    }
}
