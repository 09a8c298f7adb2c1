//! Delimited Text Parser
//!
//! CSV/TSVを単一シートのワークブックとして読み込む。

use std::io::Read;

use csv::ReaderBuilder;

use crate::builder::ConversionConfig;
use crate::error::XlsRetroError;
use crate::output::FALLBACK_SHEET_NAME;
use crate::types::{CellValue, Sheet, Workbook};

/// 区切り文字形式のテキストを読み込む
///
/// 先頭レコードはヘッダー（`config.header_row`が有効な場合）、残りは文字列セルの行になります。
/// レコード長の不一致はそのまま保持します。レコードが1つもない場合も、
/// ヘッダーも行も持たないシートを1枚返します。
pub(crate) fn parse<R: Read>(
    reader: R,
    delimiter: u8,
    config: &ConversionConfig,
) -> Result<Workbook, XlsRetroError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut sheet = Sheet::new(FALLBACK_SHEET_NAME);

    for (record_idx, record) in csv_reader.records().enumerate() {
        let record = record?;

        if record_idx == 0 && config.header_row {
            sheet.headers = record.iter().map(str::to_string).collect();
            continue;
        }

        sheet
            .rows
            .push(record.iter().map(|field| CellValue::String(field.to_string())).collect());
    }

    log::debug!(
        "read delimited source: {} headers, {} rows",
        sheet.headers.len(),
        sheet.rows.len()
    );

    Ok(Workbook::from(sheet))
}
