//! XML Emitter Module
//!
//! 表形式データの行を、選択されたヘッダー名をタグ名とするXMLへ変換するモジュール。
//!
//! # 出力形式
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rows>
//!   <row>
//!     <HeaderName>value</HeaderName>
//!   </row>
//! </rows>
//! ```
//!
//! 名前空間・属性・CDATAは使用しません。タグ名はヘッダー文字列をそのまま使うため、
//! 空白や括弧を含むヘッダーは整形式のXMLにならない点に注意してください。

use rayon::prelude::*;

use crate::api::TextEscaping;
use crate::types::Row;

/// XML宣言
pub const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const ROW_INDENT: &str = "  ";
const FIELD_INDENT: &str = "    ";

/// XMLエミッター
///
/// 入力を変更せず、I/Oも行わない純粋な変換器です。
/// 同じ引数に対しては常にバイト単位で同一の文字列を返します。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XmlEmitter {
    escaping: TextEscaping,
}

impl XmlEmitter {
    /// エスケープ方式を指定してエミッターを生成
    pub fn new(escaping: TextEscaping) -> Self {
        Self { escaping }
    }

    /// 現在のエスケープ方式
    pub fn escaping(&self) -> TextEscaping {
        self.escaping
    }

    /// 1行分の`<row>`要素を生成する
    ///
    /// 選択されたヘッダーの順に要素を出力します。行にキーが存在しない場合は
    /// 空要素（`<B></B>`）になります。
    ///
    /// # 例
    ///
    /// ```rust
    /// use sheetxml::{Row, XmlEmitter};
    ///
    /// let row = Row::from_iter([("A", "1")]);
    /// let xml = XmlEmitter::default().emit_row(&row, &["A", "B"]);
    /// assert_eq!(xml, "<row>\n    <A>1</A>\n    <B></B>\n  </row>");
    /// ```
    pub fn emit_row<S: AsRef<str>>(&self, row: &Row, selected_headers: &[S]) -> String {
        let mut out = String::with_capacity(16 + selected_headers.len() * 32);
        out.push_str("<row>\n");

        for header in selected_headers {
            let tag = header.as_ref();
            let text = row.get(tag).map(|v| v.to_string()).unwrap_or_default();

            out.push_str(FIELD_INDENT);
            out.push('<');
            out.push_str(tag);
            out.push('>');
            match self.escaping {
                TextEscaping::Verbatim => out.push_str(&text),
                TextEscaping::Xml => out.push_str(&quick_xml::escape::escape(&text)),
            }
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }

        out.push_str(ROW_INDENT);
        out.push_str("</row>");
        out
    }

    /// XML宣言とルート`<rows>`要素で全行を包んだ文書を生成する
    ///
    /// 行は並列に生成されますが、入力順に連結されるため出力は逐次処理と同一です。
    ///
    /// # 例
    ///
    /// ```rust
    /// use sheetxml::{Row, XmlEmitter};
    ///
    /// let rows: Vec<Row> = Vec::new();
    /// let xml = XmlEmitter::default().emit_document(&rows, &["A"]);
    /// assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rows>\n</rows>");
    /// ```
    pub fn emit_document<S: AsRef<str> + Sync>(&self, rows: &[Row], selected_headers: &[S]) -> String {
        let fragments: Vec<String> = rows
            .par_iter()
            .map(|row| self.emit_row(row, selected_headers))
            .collect();

        let body_len: usize = fragments.iter().map(|f| f.len() + ROW_INDENT.len() + 1).sum();
        let mut out = String::with_capacity(XML_PROLOG.len() + body_len + 16);
        out.push_str(XML_PROLOG);
        out.push_str("\n<rows>\n");
        for fragment in &fragments {
            out.push_str(ROW_INDENT);
            out.push_str(fragment);
            out.push('\n');
        }
        out.push_str("</rows>");

        tracing::debug!(
            rows = rows.len(),
            tags_per_row = selected_headers.len(),
            bytes = out.len(),
            "emitted XML document"
        );

        out
    }
}

/// 1行分の`<row>`要素を生成する（値はエスケープしない）
pub fn emit_row<S: AsRef<str>>(row: &Row, selected_headers: &[S]) -> String {
    XmlEmitter::default().emit_row(row, selected_headers)
}

/// 全行を含むXML文書を生成する（値はエスケープしない）
pub fn emit_document<S: AsRef<str> + Sync>(rows: &[Row], selected_headers: &[S]) -> String {
    XmlEmitter::default().emit_document(rows, selected_headers)
}
