//! Preview Module
//!
//! プレビュー行（先頭5行）をMarkdownテーブルとして出力するモジュール。
//! 列幅は表示幅（全角文字は2）で揃えます。

use std::io::Write;
use unicode_width::UnicodeWidthStr;

use crate::error::SheetXmlError;
use crate::types::TabularData;

impl TabularData {
    /// プレビューをMarkdownテーブルとして出力する
    ///
    /// 行数がプレビュー上限を超える場合は、テーブルの後に
    /// `Showing 5 of N rows`を出力します。ヘッダーがない場合は何も出力しません。
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Name  | Age |
    /// |-------|-----|
    /// | Alice | 30  |
    /// ```
    pub fn write_preview_markdown<W: Write>(&self, writer: &mut W) -> Result<(), SheetXmlError> {
        if self.headers().is_empty() {
            return Ok(());
        }

        let header_cells: Vec<String> = self.headers().iter().map(|h| escape_markdown(h)).collect();
        let body: Vec<Vec<String>> = self
            .preview_rows()
            .iter()
            .map(|row| {
                self.headers()
                    .iter()
                    .map(|h| {
                        row.get(h)
                            .map(|v| escape_markdown(&v.to_string()))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        // 最小幅は3文字（区切り行の最小幅）
        let mut widths = vec![3usize; header_cells.len()];
        for cells in std::iter::once(&header_cells).chain(body.iter()) {
            for (col_idx, cell) in cells.iter().enumerate() {
                widths[col_idx] = widths[col_idx].max(cell.width());
            }
        }

        write_markdown_row(writer, &header_cells, &widths)?;
        let mut separator = String::from("|");
        for &width in &widths {
            separator.push_str(&"-".repeat(width + 2));
            separator.push('|');
        }
        writeln!(writer, "{}", separator)?;
        for cells in &body {
            write_markdown_row(writer, cells, &widths)?;
        }

        if self.is_truncated() {
            writeln!(writer)?;
            writeln!(
                writer,
                "Showing {} of {} rows",
                self.preview_rows().len(),
                self.row_count()
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// プレビューをMarkdown文字列として取得する
    pub fn render_preview_markdown(&self) -> String {
        let mut buffer = Vec::new();
        // Vec<u8>への書き込みは失敗しない
        if self.write_preview_markdown(&mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

fn write_markdown_row<W: Write>(
    writer: &mut W,
    cells: &[String],
    widths: &[usize],
) -> Result<(), SheetXmlError> {
    write!(writer, "|")?;
    for (cell, &width) in cells.iter().zip(widths) {
        let padding = width.saturating_sub(cell.width());
        write!(writer, " {}{} |", cell, " ".repeat(padding))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}
