//! Parser Module
//!
//! calamineを使用したExcelファイル解析。
//! ワークシートを表形式データ（ヘッダー + 行）として抽出します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
