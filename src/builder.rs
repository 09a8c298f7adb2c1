//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::api::SheetSelector;
use crate::error::XlsRetroError;
use crate::output::SpreadsheetMlRenderer;
use crate::types::Workbook;

/// インデント幅の上限
const MAX_INDENT: usize = 8;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式（ファイルから読み込む場合に適用）
    pub sheet_selector: SheetSelector,

    /// 入れ子1段あたりの空白数（0でインデントなし）
    pub indent: usize,

    /// 入力ソースの先頭行をヘッダーとして扱うか
    pub header_row: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            indent: 2,
            header_row: true,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsretro::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), xlsretro::XlsRetroError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_indent(0)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: すべてのシート
    /// - インデント: 空白2つ
    /// - ヘッダー行: 入力の先頭行をヘッダーとして扱う
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// ファイルから読み込んだワークブックのうち、変換対象のシートを選択する
    ///
    /// メモリ上で構築した`Workbook`を書き出す場合には適用されません。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsretro::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("Payments".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// 出力XMLのインデント幅（空白の数）を指定する
    ///
    /// `0`を指定すると改行・インデントなしで出力します（宣言と処理命令の後の改行は残ります）。
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.config.indent = spaces;
        self
    }

    /// 入力ソースの先頭行をヘッダーとして扱うかを指定する
    ///
    /// * `true`: 先頭行をヘッダー（すべて文字列型）として出力（デフォルト）
    /// * `false`: 先頭行もデータ行として扱う
    pub fn with_header_row(mut self, header_row: bool) -> Self {
        self.config.header_row = header_row;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `XlsRetroError::Config(String)`: 設定の検証に失敗した場合
    ///   * インデント幅が8を超える
    ///   * `SheetSelector::Indices`/`Names`が空
    pub fn build(self) -> Result<Converter, XlsRetroError> {
        // 1. インデント幅の検証
        if self.config.indent > MAX_INDENT {
            return Err(XlsRetroError::Config(format!(
                "Invalid indent: {} (max: {})",
                self.config.indent, MAX_INDENT
            )));
        }

        // 2. シート選択の検証
        let empty_selection = match &self.config.sheet_selector {
            SheetSelector::Indices(indices) => indices.is_empty(),
            SheetSelector::Names(names) => names.is_empty(),
            _ => false,
        };
        if empty_selection {
            return Err(XlsRetroError::Config(
                "Empty sheet selection: at least one sheet must be selected".to_string(),
            ));
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// `Workbook`をSpreadsheetML形式の`.xls`として書き出すためのメインエントリーポイントです。
/// 変換はすべて状態を持たない単一パスの処理で、同じ入力からは常に同じバイト列を生成します。
///
/// # 使用例
///
/// ```rust
/// use xlsretro::{CellValue, ConverterBuilder, Sheet, Workbook};
///
/// # fn main() -> Result<(), xlsretro::XlsRetroError> {
/// let sheet = Sheet::from_rows(
///     "Demo",
///     ["A", "B"],
///     vec![
///         vec![CellValue::from("x"), CellValue::from(1)],
///         vec![CellValue::from("y"), CellValue::from(2)],
///     ],
/// );
///
/// let converter = ConverterBuilder::new().build()?;
/// let bytes = converter.to_bytes(&Workbook::from(sheet))?;
/// assert!(bytes.starts_with(b"<?xml version=\"1.0\"?>"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// SpreadsheetMLレンダラー
    renderer: SpreadsheetMlRenderer,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            renderer: SpreadsheetMlRenderer::new(config.indent),
            config,
        }
    }

    /// ワークブックを任意の書き込み先へ逐次書き出す
    ///
    /// 書き込みに失敗した時点で中断し、`XlsRetroError::Io`を返します。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsretro::{ConverterBuilder, Sheet, Workbook};
    ///
    /// # fn main() -> Result<(), xlsretro::XlsRetroError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let workbook = Workbook::from(Sheet::new("Empty"));
    /// converter.write(&workbook, std::io::stdout())?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write<W: Write>(&self, workbook: &Workbook, mut output: W) -> Result<(), XlsRetroError> {
        let mut writer = self.renderer.render(workbook, BufWriter::new(&mut output))?;
        writer.flush()?;
        Ok(())
    }

    /// ワークブックをバイト列として取得する
    ///
    /// `write`と同一のバイト列を返します。
    pub fn to_bytes(&self, workbook: &Workbook) -> Result<Vec<u8>, XlsRetroError> {
        self.renderer.render(workbook, Vec::new())
    }

    /// ワークブックをファイルへ書き出す（既存のファイルは上書き）
    pub fn write_file<P: AsRef<Path>>(
        &self,
        path: P,
        workbook: &Workbook,
    ) -> Result<(), XlsRetroError> {
        let file = File::create(path.as_ref())?;
        log::debug!("writing {}", path.as_ref().display());
        self.write(workbook, file)
    }

    /// ファイルを拡張子に応じて読み込み、シート選択を適用したワークブックを返す
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Workbook, XlsRetroError> {
        crate::parser::read_path_with(path.as_ref(), &self.config)
    }

    /// 対応する任意の入力ファイルを変換し、書き込み先へ書き出す
    pub fn convert_path<P: AsRef<Path>, W: Write>(
        &self,
        input: P,
        output: W,
    ) -> Result<(), XlsRetroError> {
        let workbook = self.read_path(input)?;
        self.write(&workbook, output)
    }

    /// 対応する任意の入力ファイルを`.xls`ファイルへ変換する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use xlsretro::ConverterBuilder;
    ///
    /// # fn main() -> Result<(), xlsretro::XlsRetroError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// converter.convert_path_to_file("report.tsv", "report.xls")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert_path_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<(), XlsRetroError> {
        let workbook = self.read_path(input)?;
        self.write_file(output, &workbook)
    }

    /// 対応する任意の入力ファイルを変換し、バイト列として返す
    pub fn convert_path_to_bytes<P: AsRef<Path>>(&self, input: P) -> Result<Vec<u8>, XlsRetroError> {
        let workbook = self.read_path(input)?;
        self.to_bytes(&workbook)
    }

    /// XLSXファイルを拡張子に関係なく読み込み、`.xls`ファイルへ変換する
    pub fn convert_xlsx_to_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<(), XlsRetroError> {
        let workbook = crate::parser::read_xlsx_path_with(input.as_ref(), &self.config)?;
        self.write_file(output, &workbook)
    }

    /// XLSXファイルを拡張子に関係なく読み込み、バイト列として返す
    pub fn convert_xlsx_to_bytes<P: AsRef<Path>>(&self, input: P) -> Result<Vec<u8>, XlsRetroError> {
        let workbook = crate::parser::read_xlsx_path_with(input.as_ref(), &self.config)?;
        self.to_bytes(&workbook)
    }

    /// 区切り文字形式のテキストを読み込み、書き込み先へ書き出す
    ///
    /// ヘッダー行とシート選択の設定が適用されます。
    pub fn convert_delimited<R: std::io::Read, W: Write>(
        &self,
        input: R,
        delimiter: u8,
        output: W,
    ) -> Result<(), XlsRetroError> {
        let workbook = crate::parser::delimited_with(input, delimiter, &self.config)?;
        self.write(&workbook, output)
    }
}
