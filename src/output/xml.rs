//! SpreadsheetML Element Writer
//!
//! `quick_xml::Writer`をラップし、開いている要素を記録することで
//! 終了タグを書き手自身が決定する要素ライター。

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::error::XlsRetroError;

/// SpreadsheetML（XML Spreadsheet 2003）の名前空間
pub(crate) const NS_SPREADSHEET: &str = "urn:schemas-microsoft-com:office:spreadsheet";
pub(crate) const NS_OFFICE: &str = "urn:schemas-microsoft-com:office:office";
pub(crate) const NS_EXCEL: &str = "urn:schemas-microsoft-com:office:excel";
pub(crate) const NS_HTML: &str = "http://www.w3.org/TR/REC-html40";

/// レガシーリーダーが形式判別に使う処理命令
const MSO_APPLICATION_PI: &str = r#"mso-application progid="Excel.Sheet""#;

/// 出力し得る要素（固定深さのスキーマ）
///
/// Workbook → Styles | Worksheet → Style | Table → Row → Cell → Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Element {
    Workbook,
    Styles,
    Style,
    Worksheet,
    Table,
    Row,
    Cell,
    Data,
}

impl Element {
    /// このスキーマで取り得る最大の入れ子の深さ
    const MAX_DEPTH: usize = 6;

    fn tag(self) -> &'static str {
        match self {
            Element::Workbook => "Workbook",
            Element::Styles => "Styles",
            Element::Style => "Style",
            Element::Worksheet => "Worksheet",
            Element::Table => "Table",
            Element::Row => "Row",
            Element::Cell => "Cell",
            Element::Data => "Data",
        }
    }
}

/// 要素単位でXMLを逐次書き出すライター
///
/// 保持する状態は開いている要素のスタックのみで、
/// 文書全体をメモリに構築することはありません。
pub(crate) struct ElementWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<Element>,
    indented: bool,
}

impl<W: Write> ElementWriter<W> {
    /// ライターを生成する
    ///
    /// `indent`は入れ子1段あたりの空白数（0でインデントなし）
    pub fn new(inner: W, indent: usize) -> Self {
        let writer = if indent == 0 {
            Writer::new(inner)
        } else {
            Writer::new_with_indent(inner, b' ', indent)
        };

        Self {
            writer,
            open: Vec::with_capacity(Element::MAX_DEPTH),
            indented: indent > 0,
        }
    }

    /// XML宣言と`mso-application`処理命令を書き出す
    pub fn prologue(&mut self) -> Result<(), XlsRetroError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
        // インデントなしの場合も宣言と処理命令はそれぞれ独立した行に置く
        if !self.indented {
            self.writer.get_mut().write_all(b"\n")?;
        }
        self.writer
            .write_event(Event::PI(BytesText::from_escaped(MSO_APPLICATION_PI)))?;
        if !self.indented {
            self.writer.get_mut().write_all(b"\n")?;
        }
        Ok(())
    }

    /// 開始タグを書き出し、要素を開いた状態にする
    pub fn open(&mut self, element: Element, attrs: &[(&str, &str)]) -> Result<(), XlsRetroError> {
        self.writer
            .write_event(Event::Start(Self::start(element, attrs)))?;
        self.open.push(element);
        Ok(())
    }

    /// 子を持たない要素（`<Cell/>`など）を書き出す
    pub fn empty(&mut self, element: Element, attrs: &[(&str, &str)]) -> Result<(), XlsRetroError> {
        self.writer
            .write_event(Event::Empty(Self::start(element, attrs)))?;
        Ok(())
    }

    /// テキストを書き出す
    ///
    /// `&`、`<`、`>`、引用符、CRは参照に置き換えられ、XML 1.0で使用できない文字はU+FFFDになります。
    pub fn text(&mut self, content: &str) -> Result<(), XlsRetroError> {
        let escaped = escape(content, Context::Text);
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        Ok(())
    }

    /// 最後に開いた要素を閉じる
    ///
    /// 開いている要素がなければ何もしません。
    pub fn close(&mut self) -> Result<(), XlsRetroError> {
        if let Some(element) = self.open.pop() {
            self.writer
                .write_event(Event::End(BytesEnd::new(element.tag())))?;
        }
        Ok(())
    }

    /// 開いている要素をすべて閉じ、内部のライターを返す
    pub fn finish(mut self) -> Result<W, XlsRetroError> {
        while !self.open.is_empty() {
            self.close()?;
        }
        Ok(self.writer.into_inner())
    }

    /// 現在の入れ子の深さ
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn start<'a>(element: Element, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(element.tag());
        for &(key, value) in attrs {
            start.push_attribute(Attribute {
                key: QName(key.as_bytes()),
                value: match escape(value, Context::Attribute) {
                    Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                    Cow::Owned(s) => Cow::Owned(s.into_bytes()),
                },
            });
        }
        start
    }
}

/// エスケープ対象の出現位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    Attribute,
}

/// XML 1.0の`Char`生成規則に含まれない文字
fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

fn replacement(c: char, context: Context) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        // 読み込み時の改行正規化と属性値正規化で失われないよう文字参照にする
        '\r' => Some("&#xD;"),
        '\t' if context == Context::Attribute => Some("&#x9;"),
        '\n' if context == Context::Attribute => Some("&#xA;"),
        c if is_forbidden(c) => Some("\u{FFFD}"),
        _ => None,
    }
}

/// テキストまたは属性値をエスケープする
///
/// 置き換えが不要な場合は借用のまま返します。
fn escape(value: &str, context: Context) -> Cow<'_, str> {
    let first = match value.char_indices().find(|&(_, c)| replacement(c, context).is_some()) {
        Some((idx, _)) => idx,
        None => return Cow::Borrowed(value),
    };

    let mut escaped = String::with_capacity(value.len() + 8);
    escaped.push_str(&value[..first]);
    for c in value[first..].chars() {
        match replacement(c, context) {
            Some(r) => escaped.push_str(r),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
