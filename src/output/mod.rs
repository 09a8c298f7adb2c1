//! Output Module
//!
//! ワークブックをSpreadsheetML（XML Spreadsheet 2003）文書として逐次書き出すモジュール。
//!
//! 出力構造:
//!
//! ```text
//! <?xml version="1.0"?>
//! <?mso-application progid="Excel.Sheet"?>
//! <Workbook xmlns=... xmlns:o=... xmlns:x=... xmlns:ss=... xmlns:html=...>
//!   <Styles><Style ss:ID="Default"/></Styles>
//!   <Worksheet ss:Name="..."><Table><Row><Cell>...</Cell></Row></Table></Worksheet>
//! </Workbook>
//! ```

mod xml;

use std::io::Write;

use crate::error::XlsRetroError;
use crate::formatter::{CellFormatter, Classified};
use crate::types::{CellValue, Sheet, Workbook};
use xml::{Element, ElementWriter, NS_EXCEL, NS_HTML, NS_OFFICE, NS_SPREADSHEET};

/// シート名が空の場合に使う名前
pub(crate) const FALLBACK_SHEET_NAME: &str = "Sheet1";

/// Excelが受け付けるシート名の最大文字数
pub(crate) const MAX_SHEET_NAME_CHARS: usize = 31;

/// 出力用にシート名を整える
///
/// 空なら`Sheet1`に置き換え、31文字を超える場合は先頭31文字に切り詰めます。
/// 切り詰めは文字（Unicodeスカラー値）単位です。重複の解消は行いません。
pub(crate) fn sanitize_sheet_name(name: &str) -> &str {
    if name.is_empty() {
        log::debug!("empty sheet name replaced with '{}'", FALLBACK_SHEET_NAME);
        return FALLBACK_SHEET_NAME;
    }

    match name.char_indices().nth(MAX_SHEET_NAME_CHARS) {
        Some((cut, _)) => {
            log::warn!(
                "sheet name '{}' exceeds {} characters and was truncated",
                name,
                MAX_SHEET_NAME_CHARS
            );
            &name[..cut]
        }
        None => name,
    }
}

/// SpreadsheetMLレンダラー
///
/// 入力のワークブックを変更せず、同じ入力からは常に同じバイト列を生成します。
#[derive(Debug)]
pub(crate) struct SpreadsheetMlRenderer {
    /// 入れ子1段あたりの空白数
    indent: usize,

    /// セルフォーマッター
    formatter: CellFormatter,
}

impl SpreadsheetMlRenderer {
    pub fn new(indent: usize) -> Self {
        Self {
            indent,
            formatter: CellFormatter::new(),
        }
    }

    /// ワークブック全体を書き出し、書き込み先を返す
    ///
    /// 書き込みに失敗した時点で中断し、エラーをそのまま返します。
    /// 途中まで書かれた内容の後始末は行いません。
    pub fn render<W: Write>(&self, workbook: &Workbook, writer: W) -> Result<W, XlsRetroError> {
        let mut out = ElementWriter::new(writer, self.indent);

        out.prologue()?;
        out.open(
            Element::Workbook,
            &[
                ("xmlns", NS_SPREADSHEET),
                ("xmlns:o", NS_OFFICE),
                ("xmlns:x", NS_EXCEL),
                ("xmlns:ss", NS_SPREADSHEET),
                ("xmlns:html", NS_HTML),
            ],
        )?;

        self.render_styles(&mut out)?;

        for (sheet_idx, sheet) in workbook.iter().enumerate() {
            log::debug!(
                "rendering sheet {} '{}' ({} rows)",
                sheet_idx,
                sheet.name,
                sheet.rows.len()
            );
            self.render_worksheet(&mut out, sheet)?;
        }

        out.finish()
    }

    fn render_styles<W: Write>(&self, out: &mut ElementWriter<W>) -> Result<(), XlsRetroError> {
        out.open(Element::Styles, &[])?;
        out.empty(Element::Style, &[("ss:ID", "Default")])?;
        out.close()
    }

    fn render_worksheet<W: Write>(
        &self,
        out: &mut ElementWriter<W>,
        sheet: &Sheet,
    ) -> Result<(), XlsRetroError> {
        let name = sanitize_sheet_name(&sheet.name);
        out.open(Element::Worksheet, &[("ss:Name", name)])?;
        out.open(Element::Table, &[])?;

        if sheet.has_headers() {
            out.open(Element::Row, &[])?;
            for header in &sheet.headers {
                self.render_cell(out, self.formatter.classify_header(header))?;
            }
            out.close()?;
        }

        for row in &sheet.rows {
            self.render_row(out, row)?;
        }

        out.close()?; // Table
        out.close() // Worksheet
    }

    fn render_row<W: Write>(
        &self,
        out: &mut ElementWriter<W>,
        row: &[CellValue],
    ) -> Result<(), XlsRetroError> {
        out.open(Element::Row, &[])?;
        for value in row {
            self.render_cell(out, self.formatter.classify(value))?;
        }
        out.close()
    }

    fn render_cell<W: Write>(
        &self,
        out: &mut ElementWriter<W>,
        cell: Classified,
    ) -> Result<(), XlsRetroError> {
        match cell {
            Classified::Empty => out.empty(Element::Cell, &[]),
            Classified::Data { kind, text } => {
                out.open(Element::Cell, &[])?;
                out.open(Element::Data, &[("ss:Type", kind.as_str())])?;
                out.text(&text)?;
                out.close()?;
                out.close()
            }
        }
    }
}
