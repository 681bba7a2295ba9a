//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

/// シート選択方式
///
/// 表形式データとして読み込むシートを選択する方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum SheetSelector {
    /// 先頭のシート（デフォルト）
    #[default]
    First,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(1)` は2番目のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),
}

/// 日付セルの出力形式
///
/// 日付セルを表形式データへ取り込む際の変換方法を指定します。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DateFormat {
    /// Excelのシリアル値をそのまま数値として保持（デフォルト）
    ///
    /// 例: `2024-01-01` → `45292`
    #[default]
    Serial,

    /// ISO 8601形式（YYYY-MM-DD）の文字列
    ///
    /// 例: `2024-01-01`
    Iso8601,

    /// カスタム形式（chrono互換フォーマット文字列）
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetxml::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), sheetxml::SheetXmlError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d.%m.%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// XML要素テキストのエスケープ方式
///
/// タグ名はどちらの方式でもヘッダー文字列をそのまま使用します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum TextEscaping {
    /// 値をそのまま埋め込む（デフォルト）
    ///
    /// `&`、`<`、`>`などもエスケープされません。
    ///
    /// ```xml
    /// <Name>A & B</Name>
    /// ```
    #[default]
    Verbatim,

    /// XMLの予約文字をエンティティ参照に置き換える
    ///
    /// ```xml
    /// <Name>A &amp; B</Name>
    /// ```
    Xml,
}
