//! These structs provide the CLI interface for the saoke CLI.

use crate::model::Month;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// saoke: A command-line tool for reading bank-statement spreadsheets.
///
/// Banks export account statements ("sao kê") as Excel files whose layout varies: title rows come
/// first, column names are Vietnamese, English or both, and a totals row closes the table. This
/// program finds the transaction table in such a file, turns each row into a typed transaction
/// and can keep the imported transactions in a local SQLite database for later review.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the local database.
    ///
    /// The directory is taken from --saoke-home (or SAOKE_HOME) and defaults to $HOME/saoke.
    /// `parse` works without it, `import` and `history` need it.
    Init,
    /// Read a statement spreadsheet and print its transactions.
    Parse(ParseArgs),
    /// Read a statement spreadsheet and save its transactions to the local database.
    Import(ImportArgs),
    /// Show saved transactions, newest first.
    History(HistoryArgs),
    /// Write a blank statement workbook that can be filled in by hand.
    Template(TemplateArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where saoke data and configuration is held. Defaults to ~/saoke
    #[arg(long, env = "SAOKE_HOME", default_value_t = default_saoke_home())]
    saoke_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, saoke_home: PathBuf) -> Self {
        Self {
            log_level,
            saoke_home: saoke_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn saoke_home(&self) -> &DisplayPath {
        &self.saoke_home
    }
}

/// How records are printed to stdout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A markdown table.
    #[default]
    Table,
    /// A JSON array of objects.
    Json,
    /// Comma separated values with a header line.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Args for the `saoke parse` command.
#[derive(Debug, Parser, Clone)]
pub struct ParseArgs {
    /// The statement file, .xlsx or .xls
    file: PathBuf,

    /// How to print the transactions
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// A JSON keyword table to use instead of the configured or built-in one
    #[arg(long)]
    keywords: Option<PathBuf>,
}

impl ParseArgs {
    pub fn new(file: impl Into<PathBuf>, format: OutputFormat, keywords: Option<PathBuf>) -> Self {
        Self {
            file: file.into(),
            format,
            keywords,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn keywords(&self) -> Option<&Path> {
        self.keywords.as_deref()
    }
}

/// Args for the `saoke import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The statement file, .xlsx or .xls
    file: PathBuf,

    /// Only import the transactions with these sequence numbers, e.g. --ids 1,2,5
    #[arg(long, value_delimiter = ',')]
    ids: Option<Vec<i64>>,

    /// Who is importing. Defaults to `uploader` from config.json
    #[arg(long)]
    uploaded_by: Option<String>,
}

impl ImportArgs {
    pub fn new(
        file: impl Into<PathBuf>,
        ids: Option<Vec<i64>>,
        uploaded_by: Option<String>,
    ) -> Self {
        Self {
            file: file.into(),
            ids,
            uploaded_by,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn ids(&self) -> Option<&[i64]> {
        self.ids.as_deref()
    }

    pub fn uploaded_by(&self) -> Option<&str> {
        self.uploaded_by.as_deref()
    }
}

/// Args for the `saoke history` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct HistoryArgs {
    /// Only show one calendar month, written MM-YYYY
    #[arg(long, conflicts_with_all = ["year", "from", "to"])]
    month: Option<Month>,

    /// Only show one calendar year
    #[arg(long, conflicts_with_all = ["from", "to"])]
    year: Option<i32>,

    /// The first day to show, written YYYY-MM-DD. Requires --to
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// The last day to show (included), written YYYY-MM-DD. Requires --from
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// The page to show, counting from 0
    #[arg(long, default_value_t = 0)]
    page: u32,

    /// The number of transactions per page
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,

    /// How to print the transactions
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl HistoryArgs {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
    }

    pub fn with_month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.from.zip(self.to)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Args for the `saoke template` command.
#[derive(Debug, Parser, Clone)]
pub struct TemplateArgs {
    /// Where to write the workbook
    #[arg(default_value = "bank_statement_template.xlsx")]
    out: PathBuf,
}

impl TemplateArgs {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self { out: out.into() }
    }

    pub fn out(&self) -> &Path {
        &self.out
    }
}

fn default_saoke_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("saoke"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --saoke-home or SAOKE_HOME instead of relying on the default \
                saoke home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("saoke")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_command() {
        let args = parse(&["saoke", "parse", "june.xlsx", "--format", "json"]);
        match args.command() {
            Command::Parse(p) => {
                assert_eq!(p.file(), Path::new("june.xlsx"));
                assert_eq!(p.format(), OutputFormat::Json);
                assert!(p.keywords().is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_import_ids_are_comma_separated() {
        let args = parse(&["saoke", "import", "june.xlsx", "--ids", "1,2,5"]);
        match args.command() {
            Command::Import(i) => assert_eq!(i.ids(), Some([1, 2, 5].as_slice())),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_history_defaults_and_month() {
        let args = parse(&["saoke", "history", "--month", "06-2023"]);
        match args.command() {
            Command::History(h) => {
                assert_eq!(h.month(), Some(Month { year: 2023, month: 6 }));
                assert_eq!(h.page(), 0);
                assert_eq!(h.page_size(), 10);
                assert_eq!(h.format(), OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_history_filters_conflict() {
        assert!(
            Args::try_parse_from(["saoke", "history", "--month", "06-2023", "--year", "2023"])
                .is_err()
        );
        assert!(Args::try_parse_from(["saoke", "history", "--from", "2023-06-01"]).is_err());
        assert!(Args::try_parse_from(["saoke", "history", "--page-size", "0"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let args = parse(&[
            "saoke",
            "--log-level",
            "debug",
            "--saoke-home",
            "/tmp/sk",
            "init",
        ]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().saoke_home().path(), Path::new("/tmp/sk"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
    }
}
