//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::sync::Arc;

use thiserror::Error;

/// xlsretroクレート全体で使用するエラー型
///
/// 入力ソースの読み込み、XMLの書き出し、設定の検証中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイルが存在しない、書き込み先が壊れたなど）
/// - `Parse`: XLSXファイルの解析中に発生したエラー（calamine由来）
/// - `Csv`: CSV/TSVの解析中に発生したエラー
/// - `Xml`: XMLの書き出し中に発生したI/O以外のエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `UnsupportedFormat`: 拡張子から入力形式を判別できなかったエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsretro::XlsRetroError;
/// use std::fs::File;
///
/// fn open_source(path: &str) -> Result<(), XlsRetroError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsRetroError {
    /// I/O操作中に発生したエラー
    ///
    /// 入力ファイルの読み込み失敗、出力先への書き込み失敗など、
    /// `std::io::Error`が発生した場合に使用されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XLSXファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したコンテナなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// 区切り文字形式（CSV/TSV）の解析中に発生したエラー
    #[error("Failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),

    /// XML書き出し中に発生したエラー（I/Oエラーは`Io`に展開される）
    #[error("XML write error: {0}")]
    Xml(quick_xml::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時、またはシート選択の適用時に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsretro::{ConverterBuilder, XlsRetroError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_indent(64)
    ///     .build();
    ///
    /// match result {
    ///     Err(XlsRetroError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 拡張子に対応する入力リーダーが存在しないエラー
    ///
    /// 保持する文字列は小文字化された拡張子（ドットを含む）です。
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
}

impl From<quick_xml::Error> for XlsRetroError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            // 書き込み先のエラーは元のio::Errorとして呼び出し元に返す
            quick_xml::Error::Io(io) => XlsRetroError::Io(
                Arc::try_unwrap(io).unwrap_or_else(|shared| {
                    std::io::Error::new(shared.kind(), shared.to_string())
                }),
            ),
            other => XlsRetroError::Xml(other),
        }
    }
}
