use crate::model::Field;
use thiserror::Error;

/// A whole-statement failure. Problems confined to a single row never surface here; such rows are
/// skipped.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseError {
    /// The bytes could not be opened as a spreadsheet, or the workbook has no sheets.
    #[error("Unable to read the spreadsheet: {0}")]
    Workbook(String),

    #[error("Could not find transaction data header in the Excel file")]
    HeaderNotFound,

    #[error("Missing required columns in the Excel file: {}", join(.missing))]
    MissingColumns { missing: Vec<Field> },

    #[error("No valid transaction data found in the Excel file")]
    NoValidRows,
}

fn join(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let e = ParseError::MissingColumns {
            missing: vec![Field::Balance, Field::Description],
        };
        assert_eq!(
            e.to_string(),
            "Missing required columns in the Excel file: balance, description"
        );
    }
}
