//! Formatter Module
//!
//! セル値を分類し、SpreadsheetMLの`ss:Type`と要素内容のテキストを決定するモジュール。

use crate::types::CellValue;

/// `Data`要素の`ss:Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Number,
    Boolean,
    String,
}

impl DataKind {
    /// `ss:Type`属性値
    pub fn as_str(self) -> &'static str {
        match self {
            DataKind::Number => "Number",
            DataKind::Boolean => "Boolean",
            DataKind::String => "String",
        }
    }
}

/// セル1つ分の分類結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// `Data`子要素を持たない空セル
    Empty,

    /// 型とテキストを持つセル
    Data { kind: DataKind, text: String },
}

impl Classified {
    fn data(kind: DataKind, text: impl Into<String>) -> Self {
        Classified::Data {
            kind,
            text: text.into(),
        }
    }
}

/// セルフォーマッター
///
/// 分類は常に成功します。数値・論理値・空値以外はすべて文字列として扱われます。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self {
            number_formatter: NumberFormatter,
        }
    }

    /// データセルを分類する
    ///
    /// 判定順: 空値 → 数値 → 論理値 → それ以外（文字列）
    #[allow(unreachable_patterns)]
    pub fn classify(&self, value: &CellValue) -> Classified {
        match value {
            CellValue::Null => Classified::Empty,

            CellValue::Int(i) => Classified::data(DataKind::Number, i.to_string()),
            CellValue::UInt(u) => Classified::data(DataKind::Number, u.to_string()),
            CellValue::Float(f) => self.number_formatter.format(*f),

            CellValue::Bool(b) => Classified::data(DataKind::Boolean, if *b { "1" } else { "0" }),

            CellValue::String(s) => Classified::data(DataKind::String, s.as_str()),

            // 将来追加される値の種類はデバッグ表現の文字列に落とす
            other => Classified::data(DataKind::String, format!("{:?}", other)),
        }
    }

    /// ヘッダーセルを分類する
    ///
    /// ヘッダーはラベルであるため、内容が数値に見えても常に文字列として扱います。
    pub fn classify_header(&self, header: &str) -> Classified {
        Classified::data(DataKind::String, header)
    }
}

/// 数値フォーマッター
///
/// 有限値は最短往復表現の10進数（指数表記なし）で出力します。
/// NaNと無限大はSpreadsheetMLの数値として表現できないため文字列として扱います。
#[derive(Debug, Default)]
struct NumberFormatter;

impl NumberFormatter {
    fn format(&self, value: f64) -> Classified {
        if value.is_nan() {
            Classified::data(DataKind::String, "NaN")
        } else if value.is_infinite() {
            let text = if value.is_sign_positive() { "INF" } else { "-INF" };
            Classified::data(DataKind::String, text)
        } else {
            Classified::data(DataKind::Number, value.to_string())
        }
    }
}
