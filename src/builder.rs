//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use crate::api::{DateFormat, SheetSelector, TextEscaping};
use crate::emitter::XmlEmitter;
use crate::error::SheetXmlError;
use crate::formatter::{format_date, CellFormatter};
use crate::parser::WorkbookParser;
use crate::security::SecurityConfig;
use crate::selection::Selection;
use crate::types::TabularData;
use chrono::NaiveDate;
use std::io::{BufWriter, Read, Write};

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// 出力するヘッダーの選択（Noneの場合はすべてのヘッダーを出現順に出力）
    pub selection: Option<Selection>,

    /// XML要素テキストのエスケープ方式
    pub text_escaping: TextEscaping,

    /// 日付セルの変換方式
    pub date_format: DateFormat,
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetxml::{ConverterBuilder, SheetSelector, TextEscaping};
///
/// # fn main() -> Result<(), sheetxml::SheetXmlError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Index(0))
///     .with_selection(["Model", "Market"])
///     .with_text_escaping(TextEscaping::Xml)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート選択: 先頭のシート
    /// - 出力ヘッダー: すべてのヘッダー（出現順）
    /// - エスケープ: なし（値をそのまま埋め込む）
    /// - 日付: シリアル値
    pub fn new() -> Self {
        Self::default()
    }

    /// 読み込むシートを選択する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetxml::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("Data".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// XMLに出力するヘッダーとその順序を指定する
    ///
    /// 指定順がタグの出力順になります。ワークシートに存在しないヘッダーは
    /// 空要素として出力されます。
    pub fn with_selection<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.selection = Some(headers.into_iter().collect());
        self
    }

    /// XML要素テキストのエスケープ方式を指定する
    pub fn with_text_escaping(mut self, escaping: TextEscaping) -> Self {
        self.config.text_escaping = escaping;
        self
    }

    /// 日付セルの変換方式を指定する
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `SheetXmlError::Config(String)`: 設定の検証に失敗した場合
    ///   * シート名が空文字列
    ///   * カスタム日付形式が不正な書式文字列
    pub fn build(self) -> Result<Converter, SheetXmlError> {
        // 1. シート名の検証
        if let SheetSelector::Name(ref name) = self.config.sheet_selector {
            if name.is_empty() {
                return Err(SheetXmlError::Config(
                    "Sheet name must not be empty".to_string(),
                ));
            }
        }

        // 2. カスタム日付形式の検証
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            // テスト用の日付でフォーマット試行
            let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
                .ok_or_else(|| SheetXmlError::Config("Failed to create test date".to_string()))?;
            let formatted = format_date(test_date, format_str)?;
            if formatted.is_empty() {
                return Err(SheetXmlError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ExcelファイルをXMLに変換するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetxml::ConverterBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), sheetxml::SheetXmlError> {
/// let converter = ConverterBuilder::new().build()?;
/// let input = File::open("vehicles.xlsx")?;
/// let output = File::create("vehicles.xml")?;
/// converter.convert(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// XMLエミッター
    emitter: XmlEmitter,

    /// 入力の制限
    security: SecurityConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            formatter: CellFormatter::new(config.date_format.clone()),
            emitter: XmlEmitter::new(config.text_escaping),
            security: SecurityConfig::default(),
            config,
        }
    }

    /// Excelファイルを表形式データとして読み込む
    ///
    /// # 処理フロー
    ///
    /// 1. 入力サイズとZIPアーカイブの検査
    /// 2. シート選択
    /// 3. ヘッダー行と各行の抽出
    pub fn load<R: Read>(&self, input: R) -> Result<TabularData, SheetXmlError> {
        let mut parser = WorkbookParser::open(input, &self.security)?;
        let sheet_name = parser.select_sheet(&self.config.sheet_selector)?;
        parser.parse_table(&sheet_name, &self.formatter)
    }

    /// 読み込み済みの表形式データをXML文書に変換する
    ///
    /// 選択が設定されていない場合は、すべてのヘッダーを出現順に出力します。
    pub fn emit(&self, data: &TabularData) -> String {
        match &self.config.selection {
            Some(selection) => {
                let unknown = selection.unknown_headers(data);
                if !unknown.is_empty() {
                    tracing::warn!(
                        headers = ?unknown,
                        "selected headers not present in sheet; emitting empty elements"
                    );
                }
                self.emitter.emit_document(data.rows(), selection.as_slice())
            }
            None => self.emitter.emit_document(data.rows(), data.headers()),
        }
    }

    /// ExcelファイルをXML文書に変換し、出力先に書き込む
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use sheetxml::ConverterBuilder;
    /// use std::io::Cursor;
    ///
    /// # fn main() -> Result<(), sheetxml::SheetXmlError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let excel_data: Vec<u8> = vec![]; // Excelファイルのバイト列
    /// let mut xml_output = Vec::new();
    /// converter.convert(Cursor::new(excel_data), &mut xml_output)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read, W: Write>(&self, input: R, output: W) -> Result<(), SheetXmlError> {
        let data = self.load(input)?;
        let xml = self.emit(&data);

        let mut writer = BufWriter::new(output);
        writer.write_all(xml.as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    /// ExcelファイルをXML文書の文字列に変換
    pub fn convert_to_string<R: Read>(&self, input: R) -> Result<String, SheetXmlError> {
        let data = self.load(input)?;
        Ok(self.emit(&data))
    }
}
