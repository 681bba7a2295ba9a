//! WASM Bindings
//!
//! ブラウザからExcelファイルをXMLに変換するためのWebAssemblyバインディング。
//! エラーはJavaScript側で扱いやすいように文字列として返します。

use std::io::Cursor;
use wasm_bindgen::prelude::*;

use crate::builder::ConverterBuilder;
use crate::emitter::emit_row;

/// Excelファイル（バイト列）を選択したヘッダーのXML文書に変換する
///
/// # Arguments
/// * `excel_bytes` - JavaScriptの`Uint8Array`として渡されたExcelファイル
/// * `selected_headers` - 出力するヘッダー（この順序でタグを出力）
#[wasm_bindgen]
pub fn generate_xml(excel_bytes: &[u8], selected_headers: Vec<String>) -> Result<String, String> {
    let converter = ConverterBuilder::new()
        .with_selection(selected_headers)
        .build()
        .map_err(|e| format!("Failed to create converter: {}", e))?;

    converter
        .convert_to_string(Cursor::new(excel_bytes))
        .map_err(|e| format!("Conversion error: {}", e))
}

/// 指定した1行だけを`<row>`要素として出力する
///
/// # Arguments
/// * `row_index` - データ行の位置（0始まり、ヘッダー行を除く）
#[wasm_bindgen]
pub fn generate_row_xml(
    excel_bytes: &[u8],
    row_index: usize,
    selected_headers: Vec<String>,
) -> Result<String, String> {
    let converter = ConverterBuilder::new()
        .build()
        .map_err(|e| format!("Failed to create converter: {}", e))?;

    let data = converter
        .load(Cursor::new(excel_bytes))
        .map_err(|e| format!("Conversion error: {}", e))?;

    let row = data.rows().get(row_index).ok_or_else(|| {
        format!(
            "Row index {} out of range (sheet has {} rows)",
            row_index,
            data.row_count()
        )
    })?;

    Ok(emit_row(row, &selected_headers))
}

/// バージョン情報を取得する
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
