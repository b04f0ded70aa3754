//! The blank bank-statement workbook handed to users who need to prepare a statement by hand.

use crate::Result;
use anyhow::Context;
use rust_xlsxwriter::{Format, Workbook};

/// The bilingual header row, in the column order of the template.
pub const HEADERS: [&str; 6] = [
    "STT/ No.",
    "Ngày GD/ TNX Date\nSố CT/ Doc No",
    "Số tiền ghi nợ/ Debit",
    "Số tiền ghi có/ Credit",
    "Số dư/ Balance",
    "Nội dung chi tiết/ Transactions in detail",
];

const TITLE: &str = "SAO KÊ TÀI KHOẢN/ ACCOUNT STATEMENT";
const PERIOD: &str = "Từ ngày/ From: 01/06/2023   Đến ngày/ To: 30/06/2023";
const HEADER_ROW: u32 = 3;

const SAMPLES: [[&str; 6]; 2] = [
    [
        "1",
        "01/06/2023\nFT23152001",
        "",
        "500,000",
        "1,500,000",
        "NGUYEN VAN A ung ho quy",
    ],
    [
        "2",
        "01/06/2023\nFT23152002",
        "200,000",
        "",
        "1,300,000",
        "Chi ho tro",
    ],
];

const FOOTER: &str = "Tổng số/ Total";

const WIDTHS: [f64; 6] = [8.0, 22.0, 18.0, 18.0, 18.0, 48.0];

/// Builds the template workbook and returns its xlsx bytes.
pub fn statement_template() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let wrap = Format::new().set_text_wrap();
    let worksheet = workbook.add_worksheet();

    worksheet
        .write_string_with_format(0, 0, TITLE, &bold)
        .context("Unable to write the template title")?;
    worksheet
        .write_string(1, 0, PERIOD)
        .context("Unable to write the template period")?;

    for (col, (header, width)) in HEADERS.iter().zip(WIDTHS).enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(HEADER_ROW, col, *header, &bold)
            .context("Unable to write the template header")?;
        worksheet
            .set_column_width(col, width)
            .context("Unable to size the template columns")?;
    }

    for (offset, sample) in SAMPLES.iter().enumerate() {
        let row = HEADER_ROW + 1 + offset as u32;
        for (col, value) in sample.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string_with_format(row, col as u16, *value, &wrap)
                .context("Unable to write a template sample row")?;
        }
    }

    let footer_row = HEADER_ROW + 1 + SAMPLES.len() as u32;
    worksheet
        .write_string_with_format(footer_row, 0, FOOTER, &bold)
        .context("Unable to write the template footer")?;

    workbook
        .save_to_buffer()
        .context("Unable to serialize the template workbook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use chrono::Timelike;

    #[test]
    fn test_template_normalizes() {
        let bytes = statement_template().unwrap();
        let records = normalize(&bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].doc_number, "FT23152001");
        assert_eq!(records[1].date.second(), 1);
        assert_eq!(records[1].description, "Chi ho tro");
    }
}
