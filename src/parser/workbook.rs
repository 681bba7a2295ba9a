//! Workbook Parser Module
//!
//! calamineを使用してワークシートを表形式データ（ヘッダー + 行）に変換します。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use crate::api::SheetSelector;
use crate::error::SheetXmlError;
use crate::formatter::CellFormatter;
use crate::security::SecurityConfig;
use crate::types::{Row, TabularData, Value};

/// 空のヘッダーセルに割り当てる列名の接頭辞
const EMPTY_HEADER_NAME: &str = "__EMPTY";

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser<R: Read + Seek + Clone> {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<R>,
}

impl WorkbookParser<Cursor<Vec<u8>>> {
    /// 入力を検査したうえでワークブックを開く
    ///
    /// # 引数
    ///
    /// * `reader` - Excelファイルを読み込むためのリーダー
    /// * `security` - 入力サイズとZIPアーカイブの制限
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合
    /// * `Err(SheetXmlError::SecurityViolation)` - 制限に違反した場合
    /// * `Err(SheetXmlError::Parse)` / `Err(SheetXmlError::Zip)` - 読み込みに失敗した場合
    /// * `Err(SheetXmlError::Config)` - XLSX以外の形式の場合
    pub fn open<R: Read>(mut reader: R, security: &SecurityConfig) -> Result<Self, SheetXmlError> {
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;
        security.check_input_size(bytes_read)?;

        let entries = security.check_archive(&buffer)?;

        let sheets = open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(SheetXmlError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(SheetXmlError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        tracing::debug!(
            bytes = bytes_read,
            entries,
            sheets = workbook.sheet_names().len(),
            "opened workbook"
        );

        Ok(WorkbookParser { workbook })
    }
}

impl<R: Read + Seek + Clone> WorkbookParser<R> {
    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 選択されたシート名
    /// * `Err(SheetXmlError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, SheetXmlError> {
        let all_sheet_names = self.sheet_names();

        match selector {
            SheetSelector::First => all_sheet_names
                .first()
                .cloned()
                .ok_or_else(|| SheetXmlError::Config("Workbook contains no sheets".to_string())),

            SheetSelector::Index(index) => {
                all_sheet_names.get(*index).cloned().ok_or_else(|| {
                    SheetXmlError::Config(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    ))
                })
            }

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(SheetXmlError::Config(format!("Sheet '{}' not found", name)));
                }
                Ok(name.clone())
            }
        }
    }

    /// シートを表形式データに変換
    ///
    /// # 変換規則
    ///
    /// - 最初の空でない行をヘッダー行とする
    /// - 空のヘッダーセルは、その列に値がある場合のみ`__EMPTY`、`__EMPTY_1`、…と命名する
    /// - 空セルは行のキーとして登録しない
    /// - すべてのセルが空の行はスキップする
    /// - 同名のヘッダーは2つ目以降を`名前_1`、`名前_2`、…とする
    pub fn parse_table(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
    ) -> Result<TabularData, SheetXmlError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SheetXmlError::Parse(e.into()))?;

        let mut rows_iter = range
            .rows()
            .skip_while(|row| row.iter().all(|cell| matches!(cell, Data::Empty)));

        let header_cells = match rows_iter.next() {
            Some(cells) => cells,
            None => {
                tracing::debug!(sheet = sheet_name, "sheet has no data");
                return Ok(TabularData::default());
            }
        };

        let header_values = header_cells
            .iter()
            .map(|cell| formatter.format_header(cell))
            .collect::<Result<Vec<_>, _>>()?;

        // 列インデックスと値のペアとして行を収集
        let mut populated = vec![false; header_values.len()];
        let mut raw_rows: Vec<Vec<(usize, Value)>> = Vec::new();
        for row in rows_iter {
            let mut cells = Vec::new();
            for (col_idx, cell) in row.iter().enumerate() {
                if let Some(value) = formatter.format_cell(cell)? {
                    if let Some(flag) = populated.get_mut(col_idx) {
                        *flag = true;
                    }
                    cells.push((col_idx, value));
                }
            }
            if !cells.is_empty() {
                raw_rows.push(cells);
            }
        }

        let column_names = name_columns(header_values, &populated);

        let rows: Vec<Row> = raw_rows
            .into_iter()
            .map(|cells| {
                let mut row = Row::new();
                for (col_idx, value) in cells {
                    if let Some(Some(name)) = column_names.get(col_idx) {
                        row.insert_first(name.as_str(), value);
                    }
                }
                row
            })
            .collect();

        let headers: Vec<String> = column_names.into_iter().flatten().collect();

        tracing::debug!(
            sheet = sheet_name,
            headers = headers.len(),
            rows = rows.len(),
            "parsed sheet"
        );

        Ok(TabularData::new(headers, rows))
    }
}

/// ヘッダーセルの値から列名を決定する
///
/// `None`の列は出力対象外（ヘッダーも値もない列）です。
/// 同名の列には出現順に`_1`、`_2`、…を付けて一意にします。
fn name_columns(header_values: Vec<Option<String>>, populated: &[bool]) -> Vec<Option<String>> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header_values
        .into_iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let base = match header {
                Some(name) => name,
                None if populated.get(col_idx).copied().unwrap_or(false) => {
                    EMPTY_HEADER_NAME.to_string()
                }
                None => return None,
            };
            let name = unique_name(&base, &mut seen);
            if name != base || base == EMPTY_HEADER_NAME {
                tracing::warn!(column = col_idx, name = %name, "header cell renamed");
            }
            Some(name)
        })
        .collect()
}

fn unique_name(base: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut counter = match seen.get(base) {
        Some(&counter) => counter,
        None => {
            seen.insert(base.to_string(), 1);
            return base.to_string();
        }
    };
    let mut candidate = format!("{}_{}", base, counter);
    while seen.contains_key(&candidate) {
        counter += 1;
        candidate = format!("{}_{}", base, counter);
    }
    seen.insert(base.to_string(), counter + 1);
    seen.insert(candidate.clone(), 1);
    candidate
}


// ワークブック全体の解析は統合テスト（tests/）で実装します。
// 実際のXLSXファイルが必要なため、rust_xlsxwriterで生成したデータを使用します。
