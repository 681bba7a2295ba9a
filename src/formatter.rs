//! Formatter Module
//!
//! calamineのセルデータを表形式データの値（`Value`）へ変換するモジュール。

use std::fmt::Write as _;

use calamine::{Data, ExcelDateTime};
use chrono::NaiveDate;

use crate::api::DateFormat;
use crate::error::SheetXmlError;
use crate::types::Value;

/// セルフォーマッター
///
/// セル値の変換処理のファサードとして機能します。
#[derive(Debug, Clone, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
        }
    }

    /// セル値を変換
    ///
    /// # 戻り値
    ///
    /// * `Ok(Some(Value))` - 値を持つセル
    /// * `Ok(None)` - 空セル（行のキーとして登録しない）
    /// * `Err(SheetXmlError)` - 日付が範囲外の場合
    pub fn format_cell(&self, cell: &Data) -> Result<Option<Value>, SheetXmlError> {
        let value = match cell {
            Data::Empty => return Ok(None),
            Data::Int(i) => Value::Number(*i as f64),
            Data::Float(f) => Value::Number(*f),
            Data::String(s) => Value::String(s.clone()),
            Data::Bool(b) => Value::Bool(*b),
            Data::DateTime(dt) => self.date_formatter.format(dt)?,
            Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
            Data::Error(e) => Value::String(e.to_string()),
            #[allow(unreachable_patterns)]
            other => Value::String(other.to_string()),
        };
        Ok(Some(value))
    }

    /// ヘッダーセルを文字列化
    ///
    /// 空セルの場合は`None`を返します。
    pub fn format_header(&self, cell: &Data) -> Result<Option<String>, SheetXmlError> {
        Ok(self.format_cell(cell)?.map(|v| v.to_string()))
    }
}

/// 日付フォーマッター
///
/// Excelの日付値を`DateFormat`に従って変換します。
/// 1900年・1904年のどちらのエポックかはcalamineの`ExcelDateTime`が保持しています。
#[derive(Debug, Clone, Default)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

/// 日付として扱うシリアル値の絶対値の上限（9999-12-31の翌日）
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

impl DateFormatter {
    /// 日付値を変換
    ///
    /// `Serial`の場合はワークブックに格納されたシリアル値をそのまま返します。
    ///
    /// # エポックシステム
    ///
    /// - 1900年エポック: シリアル値1 = 1900年1月1日（シリアル値60以前はうるう年バグの分を補正）
    /// - 1904年エポック: シリアル値0 = 1904年1月1日
    pub fn format(&self, date_time: &ExcelDateTime) -> Result<Value, SheetXmlError> {
        let pattern = match &self.date_format {
            DateFormat::Serial => return Ok(Value::Number(date_time.as_f64())),
            DateFormat::Iso8601 => "%Y-%m-%d",
            DateFormat::Custom(format_str) => format_str.as_str(),
        };

        let date = excel_date(date_time)?;
        Ok(Value::String(format_date(date, pattern)?))
    }
}

/// Excelの日付値を日付に変換（時刻部分は切り捨て）
///
/// 範囲外のシリアル値は`Config`エラーになります。
fn excel_date(date_time: &ExcelDateTime) -> Result<NaiveDate, SheetXmlError> {
    let serial_value = date_time.as_f64();
    // chronoの期間計算はミリ秒換算で範囲外になるとパニックするため、先に範囲を検査する
    if !serial_value.is_finite() || serial_value.abs() > MAX_DATE_SERIAL {
        return Err(SheetXmlError::Config(format!(
            "Date serial value out of range: {}",
            serial_value
        )));
    }

    date_time
        .as_datetime()
        .map(|dt| dt.date())
        .ok_or_else(|| {
            SheetXmlError::Config(format!(
                "Date calculation overflow: serial_value={}",
                serial_value
            ))
        })
}

/// chrono互換のフォーマット文字列で日付を整形する
///
/// 不正な書式指定子は`Config`エラーになります。
pub(crate) fn format_date(date: NaiveDate, pattern: &str) -> Result<String, SheetXmlError> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).map_err(|_| {
        SheetXmlError::Config(format!("Invalid date format string: '{}'", pattern))
    })?;
    Ok(out)
}
