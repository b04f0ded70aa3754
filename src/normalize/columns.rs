use crate::model::{contains_any, Cell, Field, KeywordTable};
use crate::normalize::ParseError;
use std::collections::BTreeMap;

/// The column index of each canonical field, resolved from the header row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ColumnMap {
    indexes: BTreeMap<Field, usize>,
}

impl ColumnMap {
    /// Resolves every canonical field to the first header cell containing one of its keywords.
    ///
    /// Fails if any field is unresolved, or if it resolves to a column already claimed by an
    /// earlier field. All offending fields are reported together.
    pub fn resolve(header: &[Cell], keywords: &KeywordTable) -> Result<Self, ParseError> {
        let texts: Vec<String> = header.iter().map(Cell::as_text).collect();
        let mut indexes = BTreeMap::new();
        let mut missing = Vec::new();

        for field in Field::ALL {
            let found = texts
                .iter()
                .position(|t| contains_any(t, keywords.column_keywords(field)));
            match found {
                Some(ix) if !indexes.values().any(|&taken| taken == ix) => {
                    indexes.insert(field, ix);
                }
                _ => missing.push(field),
            }
        }

        if !missing.is_empty() {
            return Err(ParseError::MissingColumns { missing });
        }
        Ok(Self { indexes })
    }

    pub fn index(&self, field: Field) -> usize {
        // resolve() guarantees every field is present
        self.indexes.get(&field).copied().unwrap_or_default()
    }

    /// The cell of `row` that holds `field`, or an empty cell when the row is too short.
    pub fn cell<'a>(&self, row: &'a [Cell], field: Field) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        row.get(self.index(field)).unwrap_or(&EMPTY)
    }
}

/// Returns the index of the first row that matches every header marker group.
pub fn find_header(rows: &[Vec<Cell>], keywords: &KeywordTable) -> Option<usize> {
    rows.iter().position(|row| keywords.is_header_row(row))
}

/// Returns the exclusive end of the transaction region that starts at `start`: the index of the
/// first footer row, or `rows.len()` if there is none.
pub fn find_footer(rows: &[Vec<Cell>], start: usize, keywords: &KeywordTable) -> usize {
    rows.iter()
        .enumerate()
        .skip(start)
        .find(|(_, row)| !row.is_empty() && keywords.is_footer_row(row))
        .map(|(ix, _)| ix)
        .unwrap_or(rows.len())
}
