use crate::model::Cell;
use crate::normalize::ParseError;
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use tracing::debug;

/// Decodes `bytes` as a spreadsheet and returns the cells of its first worksheet, row by row.
///
/// The container format (xlsx, xlsm, xlsb, xls, ods) is detected by the spreadsheet library.
pub fn first_sheet(bytes: &[u8]) -> Result<Vec<Vec<Cell>>, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ParseError::Workbook(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ParseError::Workbook(String::from("the workbook has no sheets")))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ParseError::Workbook(format!("unable to read sheet '{sheet_name}': {e}")))?;

    debug!(
        "Read sheet '{sheet_name}' with {} rows and {} columns",
        range.height(),
        range.width()
    );

    Ok(range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::StatementBuilder;

    #[test]
    fn test_garbage_is_workbook_error() {
        let result = first_sheet(b"this is not a spreadsheet");
        assert!(matches!(result, Err(ParseError::Workbook(_))));
    }

    #[test]
    fn test_empty_bytes_is_workbook_error() {
        assert!(matches!(first_sheet(&[]), Err(ParseError::Workbook(_))));
    }

    #[test]
    fn test_reads_text_and_numbers() {
        let bytes = StatementBuilder::new()
            .row(&["STT", "Ngày"])
            .numbers(&[1.0, 2.5])
            .build();
        let rows = first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Cell::text("STT"));
        assert_eq!(rows[1][0], Cell::Number(1.0));
        assert_eq!(rows[1][1], Cell::Number(2.5));
    }
}
