use std::path::Path;

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, Run, RunChild, Table, TableCell, TableCellContent,
    TableChild, TableRowChild,
};

use super::{normalize_whitespace, ExtractError};

/// Reads a Word document: every non-empty body paragraph first, then every
/// non-empty table cell (row-major, header rows included). A merged cell is
/// read once however many grid columns it spans.
pub(super) fn read_docx_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut parts: Vec<String> = Vec::new();
    let mut tables: Vec<&Table> = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                let text = paragraph_text(p);
                if !text.trim().is_empty() {
                    parts.push(text);
                }
            }
            DocumentChild::Table(t) => tables.push(t),
            _ => {}
        }
    }

    for table in tables {
        push_table_cells(table, &mut parts);
    }

    Ok(normalize_whitespace(&parts.join(" ")))
}

#[allow(irrefutable_let_patterns)]
fn push_table_cells(table: &Table, parts: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row else {
            continue;
        };
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell else {
                continue;
            };
            let text = cell_text(cell);
            let text = text.trim();
            if !text.is_empty() {
                parts.push(text.to_string());
            }
        }
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut out = String::new();
    push_paragraph_children(&paragraph.children, &mut out);
    out
}

fn push_paragraph_children(children: &[ParagraphChild], out: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run(run, out),
            ParagraphChild::Hyperlink(link) => push_paragraph_children(&link.children, out),
            _ => {}
        }
    }
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => out.push_str(&t.text),
            RunChild::Tab(_) => out.push('\t'),
            RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

/// A cell's own paragraphs, one per line. Nested tables are not descended into.
fn cell_text(cell: &TableCell) -> String {
    cell.children
        .iter()
        .filter_map(|content| match content {
            TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, TableRow};
    use std::io::{Cursor, Write};

    fn text_paragraph(text: &str) -> Paragraph {
        Paragraph::new().add_run(Run::new().add_text(text))
    }

    fn text_cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(text_paragraph(text))
    }

    fn write_docx(docx: Docx) -> tempfile::NamedTempFile {
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(buf.get_ref()).unwrap();
        file
    }

    #[test]
    fn test_paragraphs_then_cells_in_row_major_order() {
        let table = Table::new(vec![
            TableRow::new(vec![text_cell("Company"), text_cell("Tenure")]),
            TableRow::new(vec![text_cell("Acme"), text_cell("4 years")]),
        ]);
        let docx = Docx::new()
            .add_paragraph(text_paragraph("Jane   Doe"))
            .add_table(table)
            .add_paragraph(text_paragraph("Backend engineer"));

        let file = write_docx(docx);
        let text = read_docx_text(file.path()).unwrap();
        assert_eq!(text, "Jane Doe Backend engineer Company Tenure Acme 4 years");
    }

    #[test]
    fn test_horizontally_merged_cell_is_read_once() {
        let table = Table::new(vec![
            TableRow::new(vec![text_cell("Acme Corp").grid_span(2)]),
            TableRow::new(vec![text_cell("Lead"), text_cell("4 years")]),
        ]);
        let file = write_docx(Docx::new().add_table(table));
        assert_eq!(read_docx_text(file.path()).unwrap(), "Acme Corp Lead 4 years");
    }

    #[test]
    fn test_blank_paragraphs_and_cells_are_skipped() {
        let table = Table::new(vec![TableRow::new(vec![
            text_cell("   "),
            text_cell(" 2 yrs "),
        ])]);
        let docx = Docx::new()
            .add_paragraph(text_paragraph(""))
            .add_paragraph(text_paragraph("  "))
            .add_paragraph(text_paragraph("Summary"))
            .add_table(table);

        let file = write_docx(docx);
        assert_eq!(read_docx_text(file.path()).unwrap(), "Summary 2 yrs");
    }

    #[test]
    fn test_runs_are_concatenated_within_a_paragraph() {
        let paragraph = Paragraph::new()
            .add_run(Run::new().add_text("Seven"))
            .add_run(Run::new().add_text("teen"));
        let file = write_docx(Docx::new().add_paragraph(paragraph));
        assert_eq!(read_docx_text(file.path()).unwrap(), "Seventeen");
    }

    #[test]
    fn test_garbage_is_docx_error() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"PK but not really a zip").unwrap();
        let err = read_docx_text(file.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }
}
