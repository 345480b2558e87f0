use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run, RunFonts, Style, StyleType, Table, TableCell, TableRow};

use crate::error::ExportError;
use crate::styles::ExportStyles;
use crate::table::ReportTable;

/// Generate a DOCX document holding the title and the report as a table.
pub fn generate_docx(table: &ReportTable, styles: &ExportStyles) -> Result<Vec<u8>, ExportError> {
    let title_style = Style::new("Title", StyleType::Paragraph)
        .name("Title")
        .size(styles.title_size * 2); // OOXML uses half-points

    let mut grid = Vec::with_capacity(table.rows.len() + 1);
    grid.push(TableRow::new(
        table
            .headers
            .iter()
            .map(|h| cell(h, styles, true))
            .collect(),
    ));
    for row in &table.rows {
        grid.push(TableRow::new(
            row.iter().map(|text| cell(text, styles, false)).collect(),
        ));
    }

    let docx = Docx::new()
        .add_style(title_style)
        .add_paragraph(
            Paragraph::new()
                .style("Title")
                .add_run(Run::new().add_text(&styles.title)),
        )
        .add_table(Table::new(grid));

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn cell(text: &str, styles: &ExportStyles, header: bool) -> TableCell {
    let mut run = Run::new()
        .add_text(text)
        .size(styles.body_size * 2)
        .fonts(RunFonts::new().ascii(&styles.body_font));
    if header {
        run = run.bold();
    }
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
