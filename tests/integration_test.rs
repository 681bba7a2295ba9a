//! Integration Tests for sheetxml
//!
//! rust_xlsxwriterで生成したワークブックを読み込み、表形式データとXML出力を検証します。

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use sheetxml::{
    ConverterBuilder, DateFormat, SheetSelector, SheetXmlError, TextEscaping, Value,
};
use std::io::Cursor;

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// 車両データの基本テーブル（2行目のHeightは空）
    pub fn generate_vehicles() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        // Header row
        worksheet.write_string(0, 0, "Model")?;
        worksheet.write_string(0, 1, "Market")?;
        worksheet.write_string(0, 2, "Height")?;

        // Data rows
        worksheet.write_string(1, 0, "Golf")?;
        worksheet.write_string(1, 1, "EU")?;
        worksheet.write_number(1, 2, 1450)?;

        worksheet.write_string(2, 0, "Jetta")?;
        worksheet.write_string(2, 1, "USA/CND")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 数値・真偽値・数字文字列を含むテーブル
    pub fn generate_mixed_types() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Int")?;
        worksheet.write_string(0, 1, "Float")?;
        worksheet.write_string(0, 2, "Flag")?;
        worksheet.write_string(0, 3, "Code")?;

        worksheet.write_number(1, 0, 42)?;
        worksheet.write_number(1, 1, 1.5)?;
        worksheet.write_boolean(1, 2, true)?;
        worksheet.write_string(1, 3, "007")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// ヘッダーの重複と空のヘッダーセルを含むテーブル
    pub fn generate_irregular_headers() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        // A1は空、B1とC1は同名
        worksheet.write_string(0, 1, "Name")?;
        worksheet.write_string(0, 2, "Name")?;

        worksheet.write_string(1, 0, "first")?;
        worksheet.write_string(1, 1, "left")?;
        worksheet.write_string(1, 2, "right")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 空行を挟むテーブル（ヘッダー行の前にも空行あり）
    pub fn generate_blank_rows() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Title")?;
        worksheet.write_string(2, 0, "A")?;
        worksheet.write_string(2, 1, "B")?;
        worksheet.write_string(3, 0, "a1")?;
        // row 4 is blank
        worksheet.write_string(5, 1, "b2")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 3つのシートを持つワークブック
    pub fn generate_multi_sheets() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        for (name, value) in [("Summary", "s"), ("Data", "d"), ("Notes", "n")] {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            worksheet.write_string(0, 0, "Sheet")?;
            worksheet.write_string(1, 0, value)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// 日付セルを含むテーブル（2024-01-15 = シリアル値45306）
    pub fn generate_dates() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        worksheet.write_string(0, 0, "Released")?;
        worksheet.write_number_with_format(1, 0, 45306, &date_format)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// XMLの特殊文字を含むテーブル
    pub fn generate_special_chars() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Note")?;
        worksheet.write_string(1, 0, "a<b & c")?;

        Ok(workbook.save_to_buffer()?)
    }

    /// 指定行数のテーブル
    pub fn generate_rows(count: u32) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        worksheet.write_string(0, 0, "Id")?;
        worksheet.write_string(0, 1, "Label")?;
        for i in 1..=count {
            worksheet.write_number(i, 0, i)?;
            worksheet.write_string(i, 1, format!("row{}", i))?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[test]
fn test_convert_all_headers_exact_output() {
    let excel_data = fixtures::generate_vehicles().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                    <rows>\n  \
                    <row>\n    \
                    <Model>Golf</Model>\n    \
                    <Market>EU</Market>\n    \
                    <Height>1450</Height>\n  \
                    </row>\n  \
                    <row>\n    \
                    <Model>Jetta</Model>\n    \
                    <Market>USA/CND</Market>\n    \
                    <Height></Height>\n  \
                    </row>\n\
                    </rows>";
    assert_eq!(xml, expected);
}

#[test]
fn test_convert_writes_same_document_as_string() {
    let excel_data = fixtures::generate_vehicles().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let mut output = Vec::new();
    converter
        .convert(Cursor::new(excel_data.clone()), &mut output)
        .unwrap();
    let expected = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), expected);
}

#[test]
fn test_load_tabular_data() {
    let excel_data = fixtures::generate_vehicles().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let data = converter.load(Cursor::new(excel_data)).unwrap();

    assert_eq!(data.headers(), &["Model", "Market", "Height"]);
    assert_eq!(data.row_count(), 2);
    assert_eq!(data.rows()[0].get("Height"), Some(&Value::Number(1450.0)));
    // 空セルは行のキーとして登録されない
    assert_eq!(data.rows()[1].get("Height"), None);
    assert_eq!(data.rows()[1].len(), 2);
    assert_eq!(data.preview_rows().len(), 2);
    assert!(!data.is_truncated());
}

#[test]
fn test_selection_controls_tags_and_order() {
    let excel_data = fixtures::generate_vehicles().unwrap();
    let converter = ConverterBuilder::new()
        .with_selection(["Height", "Unknown", "Model"])
        .build()
        .unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert!(xml.contains(
        "  <row>\n    <Height>1450</Height>\n    <Unknown></Unknown>\n    <Model>Golf</Model>\n  </row>"
    ));
    assert!(!xml.contains("<Market>"));
    assert_eq!(xml.matches("<row>").count(), 2);
}

#[test]
fn test_empty_selection_emits_bare_rows() {
    let excel_data = fixtures::generate_vehicles().unwrap();
    let converter = ConverterBuilder::new()
        .with_selection(Vec::<String>::new())
        .build()
        .unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert_eq!(xml.matches("  <row>\n  </row>\n").count(), 2);
}

#[test]
fn test_cell_value_types() {
    let excel_data = fixtures::generate_mixed_types().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert!(xml.contains("<Int>42</Int>"));
    assert!(xml.contains("<Float>1.5</Float>"));
    assert!(xml.contains("<Flag>true</Flag>"));
    assert!(xml.contains("<Code>007</Code>"));
}

#[test]
fn test_irregular_headers_are_named() {
    let excel_data = fixtures::generate_irregular_headers().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let data = converter.load(Cursor::new(excel_data)).unwrap();

    assert_eq!(data.headers(), &["__EMPTY", "Name", "Name_1"]);
    let row = &data.rows()[0];
    assert_eq!(row.get("__EMPTY"), Some(&Value::from("first")));
    assert_eq!(row.get("Name"), Some(&Value::from("left")));
    assert_eq!(row.get("Name_1"), Some(&Value::from("right")));
}

#[test]
fn test_blank_rows_are_skipped() {
    let excel_data = fixtures::generate_blank_rows().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let data = converter.load(Cursor::new(excel_data)).unwrap();

    // 最初の空でない行（"Title"）がヘッダー行になる
    assert_eq!(data.headers()[0], "Title");
    // "A"/"B"の行、"a1"の行、"b2"の行（空行は除外）
    assert_eq!(data.row_count(), 3);
    assert_eq!(data.rows()[1].get("Title"), Some(&Value::from("a1")));
    assert_eq!(data.rows()[2].get("Title"), None);
}

#[test]
fn test_sheet_selector_first_by_default() {
    let excel_data = fixtures::generate_multi_sheets().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert!(xml.contains("<Sheet>s</Sheet>"));
    assert_eq!(xml.matches("<row>").count(), 1);
}

#[test]
fn test_sheet_selector_index_and_name() {
    let excel_data = fixtures::generate_multi_sheets().unwrap();

    let by_index = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(2))
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data.clone()))
        .unwrap();
    assert!(by_index.contains("<Sheet>n</Sheet>"));

    let by_name = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Data".to_string()))
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data))
        .unwrap();
    assert!(by_name.contains("<Sheet>d</Sheet>"));
}

#[test]
fn test_sheet_selector_errors() {
    let excel_data = fixtures::generate_multi_sheets().unwrap();

    let missing = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Missing".to_string()))
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data.clone()));
    match missing {
        Err(SheetXmlError::Config(msg)) => assert!(msg.contains("Missing")),
        other => panic!("Expected Config error, got {:?}", other),
    }

    let out_of_range = ConverterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(3))
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data));
    match out_of_range {
        Err(SheetXmlError::Config(msg)) => assert!(msg.contains("out of range")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
fn test_date_cells_default_to_serial() {
    let excel_data = fixtures::generate_dates().unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let xml = converter.convert_to_string(Cursor::new(excel_data)).unwrap();

    assert!(xml.contains("<Released>45306</Released>"));
}

#[test]
fn test_date_cells_iso8601_and_custom() {
    let excel_data = fixtures::generate_dates().unwrap();

    let iso = ConverterBuilder::new()
        .with_date_format(DateFormat::Iso8601)
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data.clone()))
        .unwrap();
    assert!(iso.contains("<Released>2024-01-15</Released>"));

    let custom = ConverterBuilder::new()
        .with_date_format(DateFormat::Custom("%Y/%m/%d".to_string()))
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data))
        .unwrap();
    assert!(custom.contains("<Released>2024/01/15</Released>"));
}

#[test]
fn test_text_escaping() {
    let excel_data = fixtures::generate_special_chars().unwrap();

    let verbatim = ConverterBuilder::new()
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data.clone()))
        .unwrap();
    assert!(verbatim.contains("<Note>a<b & c</Note>"));

    let escaped = ConverterBuilder::new()
        .with_text_escaping(TextEscaping::Xml)
        .build()
        .unwrap()
        .convert_to_string(Cursor::new(excel_data))
        .unwrap();
    assert!(escaped.contains("<Note>a&lt;b &amp; c</Note>"));
}

#[test]
fn test_preview_truncated_to_five_rows() {
    let excel_data = fixtures::generate_rows(7).unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let data = converter.load(Cursor::new(excel_data)).unwrap();

    assert_eq!(data.row_count(), 7);
    assert_eq!(data.preview_rows().len(), sheetxml::PREVIEW_ROW_LIMIT);
    assert!(data.is_truncated());

    let markdown = data.render_preview_markdown();
    assert!(markdown.starts_with("| Id  | Label |\n|-----|-------|\n| 1   | row1  |\n"));
    assert!(!markdown.contains("row6"));
    assert!(markdown.ends_with("Showing 5 of 7 rows\n"));
}

#[test]
fn test_emit_on_loaded_data_preserves_row_order() {
    let excel_data = fixtures::generate_rows(50).unwrap();
    let converter = ConverterBuilder::new().build().unwrap();

    let data = converter.load(Cursor::new(excel_data)).unwrap();
    let xml = converter.emit(&data);

    assert_eq!(xml.matches("<row>").count(), 50);
    let positions: Vec<usize> = (1..=50)
        .map(|i| xml.find(&format!("<Id>{}</Id>", i)).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_invalid_input_is_rejected() {
    let converter = ConverterBuilder::new().build().unwrap();
    let result = converter.convert_to_string(Cursor::new(b"not an excel file".to_vec()));
    assert!(result.is_err());
}
