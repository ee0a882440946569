use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, Run, RunChild, StructuredDataTag,
    StructuredDataTagChild, Table, TableCellContent, TableChild, TableRowChild,
};

use super::types::DocxTextSource;
use super::ExtractionError;

/// DOCX text source backed by the docx-rs crate.
///
/// Walks the body in document order. Paragraphs become one line each; tables are
/// flattened row-major with cells joined by a space and rows by a newline.
/// Content controls (`w:sdt`) and tables nested in cells are walked as well.
pub struct DocxRsText;

impl DocxTextSource for DocxRsText {
    fn text(&self, docx_bytes: &[u8]) -> Result<String, ExtractionError> {
        let docx = docx_rs::read_docx(docx_bytes)
            .map_err(|e| ExtractionError::Decode(format!("DOCX parsing failed: {e}")))?;

        let mut lines: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => lines.push(paragraph_text(para)),
                DocumentChild::Table(table) => lines.extend(table_lines(table)),
                DocumentChild::StructuredDataTag(sdt) => lines.extend(sdt_lines(sdt)),
                _ => {}
            }
        }

        Ok(lines.join("\n"))
    }
}

/// Paragraph -> Run -> Text. Runs are parts of one sentence, so they are
/// concatenated without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&para.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(run, out),
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, out),
            _ => {}
        }
    }
}

fn push_run_text(run: &Run, out: &mut String) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            _ => {}
        }
    }
}

/// Block-level content control. Bare runs between blocks form one line.
fn sdt_lines(sdt: &StructuredDataTag) -> Vec<String> {
    let mut lines = Vec::new();
    let mut inline = String::new();
    for child in &sdt.children {
        match child {
            StructuredDataTagChild::Run(run) => push_run_text(run, &mut inline),
            StructuredDataTagChild::Paragraph(para) => {
                flush_inline(&mut inline, &mut lines);
                lines.push(paragraph_text(para));
            }
            StructuredDataTagChild::Table(table) => {
                flush_inline(&mut inline, &mut lines);
                lines.extend(table_lines(table));
            }
            StructuredDataTagChild::StructuredDataTag(inner) => {
                flush_inline(&mut inline, &mut lines);
                lines.extend(sdt_lines(inner));
            }
            _ => {}
        }
    }
    flush_inline(&mut inline, &mut lines);
    lines
}

fn flush_inline(inline: &mut String, lines: &mut Vec<String>) {
    if !inline.is_empty() {
        lines.push(std::mem::take(inline));
    }
}

// Row and cell enums currently have a single variant.
#[allow(irrefutable_let_patterns)]
fn table_lines(table: &Table) -> Vec<String> {
    let mut lines = Vec::new();
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        let mut cells: Vec<String> = Vec::new();
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let text = cell
                .children
                .iter()
                .flat_map(|content| match content {
                    TableCellContent::Paragraph(para) => vec![paragraph_text(para)],
                    TableCellContent::Table(inner) => table_lines(inner),
                    TableCellContent::StructuredDataTag(sdt) => sdt_lines(sdt),
                    _ => Vec::new(),
                })
                .filter(|t| !t.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            cells.push(text);
        }
        lines.push(cells.join(" "));
    }
    lines
}
