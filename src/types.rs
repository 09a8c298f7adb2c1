//! Types Module
//!
//! クレート全体で使用する共通データ型（ワークブック、シート、セル値）を定義するモジュール。

use serde::{Deserialize, Serialize};

/// セルの値を表す列挙型
///
/// 動的型付けのスカラー値を静的な列挙型として表現します。
/// シリアライズ時の型付けは`formatter`モジュールが決定します。
///
/// JSONからは型タグなしで読み込めます（`1` → `Int`、`1.5` → `Float`、
/// `null` → `Null`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum CellValue {
    /// 符号付き整数
    Int(i64),

    /// `i64`に収まらない符号なし整数
    UInt(u64),

    /// 浮動小数点数
    Float(f64),

    /// 論理値
    Bool(bool),

    /// 文字列
    String(String),

    /// 値なし（空セル）
    Null,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellValue {
                fn from(v: $t) -> Self {
                    CellValue::Int(i64::from(v))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellValue {
                fn from(v: $t) -> Self {
                    CellValue::UInt(u64::from(v)).normalized()
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for CellValue {
    fn from(v: isize) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<usize> for CellValue {
    fn from(v: usize) -> Self {
        CellValue::UInt(v as u64).normalized()
    }
}

impl CellValue {
    /// `i64`に収まる符号なし整数は`Int`に寄せる
    fn normalized(self) -> Self {
        match self {
            CellValue::UInt(u) => match i64::try_from(u) {
                Ok(i) => CellValue::Int(i),
                Err(_) => CellValue::UInt(u),
            },
            other => other,
        }
    }
}

impl From<f32> for CellValue {
    fn from(v: f32) -> Self {
        // f32 -> f64 の拡張で 1.1f32 が 1.100000023841858 にならないよう、
        // f32の最短表現を経由する
        match v.to_string().parse::<f64>() {
            Ok(f) => CellValue::Float(f),
            Err(_) => CellValue::Float(f64::from(v)),
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<char> for CellValue {
    fn from(v: char) -> Self {
        CellValue::String(v.to_string())
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::String(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::String(v)
    }
}

impl From<&String> for CellValue {
    fn from(v: &String) -> Self {
        CellValue::String(v.clone())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

/// 任意のJSON値からの変換
///
/// 配列やオブジェクトはスカラーではないため、JSONテキストの文字列として扱います。
impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    CellValue::UInt(u)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::String(n.to_string())
                }
            }
            Value::String(s) => CellValue::String(s),
            composite @ (Value::Array(_) | Value::Object(_)) => {
                CellValue::String(composite.to_string())
            }
        }
    }
}

/// 1行分のセル値
pub type Row = Vec<CellValue>;

/// ワークシート1枚分のデータ
///
/// `headers`が空でなければ、出力時に先頭行として（すべて文字列型で）書き出されます。
/// 各行の長さが`headers`と一致することは呼び出し側の責任であり、検証はしません。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// シート名（出力時にサニタイズされる）
    pub name: String,

    /// ヘッダー行（空の場合はヘッダーなし）
    #[serde(default)]
    pub headers: Vec<String>,

    /// データ行
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Sheet {
    /// 空のシートを生成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// 名前、ヘッダー、行データからシートを生成
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use xlsretro::{CellValue, Sheet};
    ///
    /// let sheet = Sheet::from_rows(
    ///     "Payments",
    ///     ["AccountNo", "Amount"],
    ///     vec![vec![CellValue::from("1234567890"), CellValue::from(1200.5)]],
    /// );
    /// assert_eq!(sheet.headers.len(), 2);
    /// ```
    pub fn from_rows<H, S>(name: impl Into<String>, headers: H, rows: Vec<Row>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            headers: headers.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// ヘッダーを設定する
    pub fn with_headers<H, S>(mut self, headers: H) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// 行を末尾に追加する
    pub fn push_row<I, V>(&mut self, row: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    /// ヘッダーが存在するか
    pub fn has_headers(&self) -> bool {
        !self.headers.is_empty()
    }
}

/// シートの順序付きコレクション（順序 = 出力順）
///
/// シート名の重複は検証しません。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// 空のワークブックを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// シートを末尾に追加する
    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sheet> {
        self.sheets.iter()
    }

    pub fn into_sheets(self) -> Vec<Sheet> {
        self.sheets
    }
}

impl From<Vec<Sheet>> for Workbook {
    fn from(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

impl From<Sheet> for Workbook {
    fn from(sheet: Sheet) -> Self {
        Self {
            sheets: vec![sheet],
        }
    }
}

impl FromIterator<Sheet> for Workbook {
    fn from_iter<T: IntoIterator<Item = Sheet>>(iter: T) -> Self {
        Self {
            sheets: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Workbook {
    type Item = &'a Sheet;
    type IntoIter = std::slice::Iter<'a, Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.iter()
    }
}

impl IntoIterator for Workbook {
    type Item = Sheet;
    type IntoIter = std::vec::IntoIter<Sheet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}
