//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! XML出力（`emit_row` / `emit_document`）自体は失敗しないため、
//! ここに定義されるエラーはすべてワークブックの読み込み・設定・問い合わせ応答の解析に由来します。

use thiserror::Error;

/// sheetxmlクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Zip` / `SecurityViolation`: XLSXアーカイブの検査で検出された問題
/// - `Xml` / `Json` / `Query`: データグラフ問い合わせ応答の解析エラー
/// - `Config`: 設定の検証に失敗したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetxml::SheetXmlError;
/// use std::fs::File;
///
/// fn read_excel_file(path: &str) -> Result<(), SheetXmlError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetXmlError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// ZIPアーカイブの解析エラー
    ///
    /// XLSXファイル（ZIPアーカイブ）の検査中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// XMLの解析エラー
    ///
    /// データグラフの問い合わせ応答（XMLテーブル）が不正な場合に発生します。
    #[error("XML error: {0}")]
    Xml(String),

    /// JSONの解析エラー
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// データグラフ問い合わせの失敗
    ///
    /// サーバーが`success: false`を返した場合、または応答の形式が想定と異なる場合に発生します。
    #[error("Query failed: {0}")]
    Query(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`や`ServerConfig::validate()`で無効な設定が
    /// 検出された場合、またはシートが見つからない場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use sheetxml::{ConverterBuilder, SheetSelector, SheetXmlError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name(String::new()))
    ///     .build();
    ///
    /// match result {
    ///     Err(SheetXmlError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃、ファイルサイズ制限などの
    /// セキュリティ制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<quick_xml::Error> for SheetXmlError {
    fn from(err: quick_xml::Error) -> Self {
        SheetXmlError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for SheetXmlError {
    fn from(err: zip::result::ZipError) -> Self {
        SheetXmlError::Zip(err.to_string())
    }
}
