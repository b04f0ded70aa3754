use crate::model::Amount;
use calamine::Data;
use std::fmt::{Display, Formatter};

/// The value of one spreadsheet cell, reduced to the shapes the statement parser cares about.
///
/// Conversions are total: a cell that does not hold what the caller asks for yields the default
/// (empty string, `0`, or a zero amount) instead of an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// The cell rendered as text. Integral numbers print without a fractional part.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_number(*n),
        }
    }

    /// Reads a leading integer: `"12"`, `"12abc"` and `12.7` all give `12`. Anything else is `0`.
    pub fn as_integer(&self) -> i64 {
        match self {
            Cell::Empty => 0,
            Cell::Text(s) => leading_integer(s),
            Cell::Number(n) if n.is_finite() => n.trunc() as i64,
            Cell::Number(_) => 0,
        }
    }

    pub fn as_amount(&self) -> Amount {
        match self {
            Cell::Empty => Amount::ZERO,
            Cell::Text(s) => Amount::parse_lenient(s),
            Cell::Number(n) => Amount::from_f64_lossy(*n),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Text(b.to_string()),
            // Statements are read as dd/MM/yyyy text, so a date typed as an Excel date is rendered
            // the same way.
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(dt) => Cell::Text(dt.format("%d/%m/%Y").to_string()),
                None => Cell::Number(dt.as_f64()),
            },
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn leading_integer(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<i64>() {
        Ok(n) if negative => -n,
        Ok(n) => n,
        Err(_) => 0,
    }
}
