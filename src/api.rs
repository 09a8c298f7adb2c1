//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

use crate::error::XlsRetroError;

/// シート選択方式
///
/// ファイルから読み込んだワークブックのうち、出力対象とするシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを変換（デフォルト）
    All,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),

    /// 複数のインデックス指定
    ///
    /// 例: `SheetSelector::Indices(vec![0, 2, 4])`
    Indices(Vec<usize>),

    /// 複数のシート名指定
    ///
    /// 例: `SheetSelector::Names(vec!["Sheet1".to_string(), "Sheet2".to_string()])`
    Names(Vec<String>),
}

impl SheetSelector {
    /// シート名の一覧から、選択されたシートのインデックスを選択順に返す
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<usize>)` - 選択されたシートのインデックス
    /// * `Err(XlsRetroError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub(crate) fn resolve(&self, sheet_names: &[String]) -> Result<Vec<usize>, XlsRetroError> {
        let check_index = |index: usize| {
            if index >= sheet_names.len() {
                Err(XlsRetroError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    sheet_names.len()
                )))
            } else {
                Ok(index)
            }
        };
        let find_name = |name: &String| {
            sheet_names
                .iter()
                .position(|candidate| candidate == name)
                .ok_or_else(|| XlsRetroError::Config(format!("Sheet '{}' not found", name)))
        };

        match self {
            SheetSelector::All => Ok((0..sheet_names.len()).collect()),
            SheetSelector::Index(index) => Ok(vec![check_index(*index)?]),
            SheetSelector::Name(name) => Ok(vec![find_name(name)?]),
            SheetSelector::Indices(indices) => indices.iter().map(|&i| check_index(i)).collect(),
            SheetSelector::Names(names) => names.iter().map(find_name).collect(),
        }
    }
}

/// 入力ソースの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceFormat {
    /// Office Open XMLスプレッドシート（`.xlsx`）
    Xlsx,

    /// カンマ区切り（`.csv`）
    Csv,

    /// タブ区切り（`.tsv`）
    Tsv,
}

impl SourceFormat {
    /// パスの拡張子（大文字小文字を区別しない）から入力形式を判別する
    ///
    /// # 戻り値
    ///
    /// * `Ok(SourceFormat)` - 対応する形式
    /// * `Err(XlsRetroError::UnsupportedFormat)` - 未対応の拡張子（ドット付き、小文字化済み）。
    ///   拡張子がない場合は空文字列
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsretro::SourceFormat;
    ///
    /// assert_eq!(SourceFormat::from_path("Report.XLSX").unwrap(), SourceFormat::Xlsx);
    /// assert!(SourceFormat::from_path("report.ods").is_err());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, XlsRetroError> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        match ext.as_str() {
            ".xlsx" => Ok(SourceFormat::Xlsx),
            ".csv" => Ok(SourceFormat::Csv),
            ".tsv" => Ok(SourceFormat::Tsv),
            _ => Err(XlsRetroError::UnsupportedFormat(ext)),
        }
    }

    /// 区切り文字形式の場合の区切り文字
    pub fn delimiter(self) -> Option<u8> {
        match self {
            SourceFormat::Xlsx => None,
            SourceFormat::Csv => Some(b','),
            SourceFormat::Tsv => Some(b'\t'),
        }
    }
}
