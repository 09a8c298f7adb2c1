//! Parser Module
//!
//! 入力ソース（XLSX、CSV、TSV）を`Workbook`として読み込む。
//! パスを受け取る関数は拡張子から読み込み方法を選択します。

mod delimited;
mod workbook;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::api::{SheetSelector, SourceFormat};
use crate::builder::ConversionConfig;
use crate::error::XlsRetroError;
use crate::types::{Sheet, Workbook};

pub(crate) use workbook::WorkbookParser;

/// ファイルを読み込み、拡張子に応じたリーダーで`Workbook`に変換する
///
/// 対応する拡張子（大文字小文字を区別しない）:
///
/// - `.xlsx`: XLSXリーダー
/// - `.csv`: カンマ区切り
/// - `.tsv`: タブ区切り
///
/// # 戻り値
///
/// * `Err(XlsRetroError::UnsupportedFormat)` - 上記以外の拡張子
/// * その他のエラーはリーダーから変更せずに返されます
///
/// # 使用例
///
/// ```rust,no_run
/// # fn main() -> Result<(), xlsretro::XlsRetroError> {
/// let workbook = xlsretro::read_path("payments.csv")?;
/// println!("{} sheet(s)", workbook.len());
/// # Ok(())
/// # }
/// ```
pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Workbook, XlsRetroError> {
    read_path_with(path.as_ref(), &ConversionConfig::default())
}

/// 区切り文字形式のテキストを単一シートのワークブックとして読み込む
///
/// シート名は`Sheet1`、先頭レコードがヘッダー、残りが文字列セルの行になります。
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Workbook, XlsRetroError> {
    delimited::parse(reader, delimiter, &ConversionConfig::default())
}

/// 区切り文字形式のファイルを読み込む
pub fn read_delimited_path<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
) -> Result<Workbook, XlsRetroError> {
    let file = File::open(path)?;
    read_delimited(BufReader::new(file), delimiter)
}

/// XLSXを読み込む（ワークシートごとに1シート）
pub fn read_xlsx<R: Read + Seek>(reader: R) -> Result<Workbook, XlsRetroError> {
    WorkbookParser::open(reader)?.parse_sheets(&ConversionConfig::default())
}

/// XLSXファイルを読み込む
pub fn read_xlsx_path<P: AsRef<Path>>(path: P) -> Result<Workbook, XlsRetroError> {
    read_xlsx_path_with(path.as_ref(), &ConversionConfig::default())
}

pub(crate) fn read_path_with(
    path: &Path,
    config: &ConversionConfig,
) -> Result<Workbook, XlsRetroError> {
    let format = SourceFormat::from_path(path)?;
    log::debug!("reading {} as {:?}", path.display(), format);

    match format.delimiter() {
        Some(delimiter) => {
            let file = File::open(path)?;
            delimited_with(BufReader::new(file), delimiter, config)
        }
        None => read_xlsx_path_with(path, config),
    }
}

pub(crate) fn delimited_with<R: Read>(
    reader: R,
    delimiter: u8,
    config: &ConversionConfig,
) -> Result<Workbook, XlsRetroError> {
    let workbook = delimited::parse(reader, delimiter, config)?;
    select_sheets(workbook, &config.sheet_selector)
}

pub(crate) fn read_xlsx_path_with(
    path: &Path,
    config: &ConversionConfig,
) -> Result<Workbook, XlsRetroError> {
    let file = File::open(path)?;
    WorkbookParser::open(BufReader::new(file))?.parse_sheets(config)
}

/// 読み込み済みのワークブックにシート選択を適用する
pub(crate) fn select_sheets(
    workbook: Workbook,
    selector: &SheetSelector,
) -> Result<Workbook, XlsRetroError> {
    if *selector == SheetSelector::All {
        return Ok(workbook);
    }

    let names: Vec<String> = workbook.iter().map(|s| s.name.clone()).collect();
    let selected = selector.resolve(&names)?;

    // 最後の出現でシートを移動し、それより前の重複のみ複製する
    let mut remaining = vec![0usize; names.len()];
    for &idx in &selected {
        remaining[idx] += 1;
    }
    let mut sheets: Vec<Option<Sheet>> = workbook.into_sheets().into_iter().map(Some).collect();

    Ok(selected
        .into_iter()
        .filter_map(|idx| {
            remaining[idx] -= 1;
            if remaining[idx] == 0 {
                sheets[idx].take()
            } else {
                sheets[idx].clone()
            }
        })
        .collect())
}
