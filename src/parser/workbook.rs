//! XLSX Parser
//!
//! calamineを使用してXLSXファイルの各ワークシートを`Sheet`として読み込む。

use std::io::{Read, Seek};

use calamine::{Data, Reader, Xlsx};

use crate::builder::ConversionConfig;
use crate::error::XlsRetroError;
use crate::types::{CellValue, Row, Sheet, Workbook};

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser<R: Read + Seek> {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<R>,
}

impl<R: Read + Seek> WorkbookParser<R> {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(XlsRetroError::Parse)` - コンテナが壊れている、XLSXでないなど
    pub fn open(reader: R) -> Result<Self, XlsRetroError> {
        let workbook = Xlsx::new(reader).map_err(|e| XlsRetroError::Parse(e.into()))?;
        Ok(Self { workbook })
    }

    /// すべてのシート名をワークブック内の順序で取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// 設定のシート選択に従ってワークシートを読み込む
    pub fn parse_sheets(&mut self, config: &ConversionConfig) -> Result<Workbook, XlsRetroError> {
        let sheet_names = self.sheet_names();
        let selected = config.sheet_selector.resolve(&sheet_names)?;

        selected
            .into_iter()
            .map(|idx| self.parse_sheet(&sheet_names[idx], config.header_row))
            .collect()
    }

    /// シートを1枚読み込む
    ///
    /// 使用範囲より前の空行・空列は空の行・空セルとして補い、
    /// 各行末尾の空セルは取り除きます。
    ///
    /// 先頭行が空の場合はそれがヘッダーとして消費されるため（ヘッダー行は出力されない）、
    /// データ行は元のシートより1行上に出力されます。列の位置は常に保たれます。
    pub fn parse_sheet(&mut self, sheet_name: &str, header_row: bool) -> Result<Sheet, XlsRetroError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| XlsRetroError::Parse(e.into()))?;

        let (row_offset, col_offset) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Row> = Vec::with_capacity(row_offset + range.height());
        rows.extend((0..row_offset).map(|_| Vec::new()));

        for cells in range.rows() {
            let mut row: Row = Vec::with_capacity(col_offset + cells.len());
            row.extend((0..col_offset).map(|_| CellValue::Null));
            row.extend(cells.iter().map(convert_cell));

            while row.last().map_or(false, CellValue::is_null) {
                row.pop();
            }
            rows.push(row);
        }

        let mut sheet = Sheet::new(sheet_name);
        let mut rows = rows.into_iter();
        if header_row {
            if let Some(first) = rows.next() {
                sheet.headers = first.iter().map(header_text).collect();
            }
        }
        sheet.rows = rows.collect();

        log::debug!(
            "read worksheet '{}': {} headers, {} rows",
            sheet_name,
            sheet.headers.len(),
            sheet.rows.len()
        );

        Ok(sheet)
    }
}

/// calamineのセル値を変換
///
/// 日付はISO 8601形式の文字列、エラー値はExcelのエラー表記（例: `#DIV/0!`）になります。
#[allow(unreachable_patterns)]
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                match dt.as_duration() {
                    Some(duration) => CellValue::String(format_duration(duration)),
                    None => CellValue::Float(dt.as_f64()),
                }
            } else {
                match dt.as_datetime() {
                    Some(datetime) => CellValue::String(format_datetime(datetime)),
                    None => CellValue::Float(dt.as_f64()),
                }
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(e.to_string()),
        Data::Empty => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

/// ヘッダーセルの文字列表現
#[allow(unreachable_patterns)]
fn header_text(value: &CellValue) -> String {
    match value {
        CellValue::Int(i) => i.to_string(),
        CellValue::UInt(u) => u.to_string(),
        CellValue::Float(f) => f.to_string(),
        // スプレッドシート上の表示に合わせる
        CellValue::Bool(true) => "TRUE".to_string(),
        CellValue::Bool(false) => "FALSE".to_string(),
        CellValue::String(s) => s.clone(),
        CellValue::Null => String::new(),
        other => format!("{:?}", other),
    }
}

fn format_datetime(datetime: chrono::NaiveDateTime) -> String {
    if datetime.time() == chrono::NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// 経過時間を`h:mm:ss`形式で表す（時は24を超えてもよい）
fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
