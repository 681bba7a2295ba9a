#![cfg_attr(not(feature = "std"), no_std)]

//! sheetxml - Pure-Rust spreadsheet parser and XML row emitter
//!
//! This crate reads the first worksheet (or a selected one) of an XLSX file into
//! an in-memory table of header-keyed rows, and serializes those rows into a
//! simple XML document containing only the headers the user selected.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sheetxml::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Open input Excel file
//!     let input = File::open("vehicles.xlsx")?;
//!
//!     // Create output XML file
//!     let output = File::create("vehicles.xml")?;
//!
//!     // Convert Excel to XML (all headers, in sheet order)
//!     converter.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Emitting Rows Directly
//!
//! ```rust
//! use sheetxml::{emit_document, emit_row, Row};
//!
//! let row: Row = [("A", "1")].into_iter().collect();
//! assert_eq!(
//!     emit_row(&row, &["A", "B"]),
//!     "<row>\n    <A>1</A>\n    <B></B>\n  </row>"
//! );
//!
//! let empty: Vec<Row> = Vec::new();
//! assert_eq!(
//!     emit_document(&empty, &["A"]),
//!     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rows>\n</rows>"
//! );
//! ```
//!
//! # Preview and Selection
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sheetxml::{ConverterBuilder, Selection};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let data = converter.load(File::open("vehicles.xlsx")?)?;
//!
//!     // 先頭5行をMarkdownで確認
//!     println!("{}", data.render_preview_markdown());
//!
//!     // 出力するヘッダーを選択（選択順がタグの出力順）
//!     let mut selection = Selection::new();
//!     selection.toggle("Model");
//!     selection.toggle("Height");
//!
//!     let xml = sheetxml::emit_document(data.rows(), selection.as_slice());
//!     println!("{}", xml);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use sheetxml::{ConverterBuilder, DateFormat, SheetSelector, TextEscaping};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_sheet_selector(SheetSelector::Name("Data".to_string()))
//!         .with_selection(["Model", "Market"])
//!         .with_text_escaping(TextEscaping::Xml)  // escape &, <, > in values
//!         .with_date_format(DateFormat::Custom("%Y年%m月%d日".to_string()))
//!         .build()?;
//!
//!     let xml = converter.convert_to_string(File::open("vehicles.xlsx")?)?;
//!     println!("{}", xml);
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod emitter;
mod error;
mod formatter;
mod parser;
mod preview;
pub mod query;
mod security;
mod selection;
mod types;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod wasm;

// 公開API
pub use api::{DateFormat, SheetSelector, TextEscaping};
pub use builder::{Converter, ConverterBuilder};
pub use emitter::{emit_document, emit_row, XmlEmitter, XML_PROLOG};
pub use error::SheetXmlError;
pub use selection::Selection;
pub use types::{Row, TabularData, Value, PREVIEW_ROW_LIMIT};
