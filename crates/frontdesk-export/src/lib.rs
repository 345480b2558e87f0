//! frontdesk-export
//!
//! Turns projected report rows into downloadable documents: a DOCX table or
//! paginated plain text.

pub mod docx;
pub mod error;
pub mod styles;
pub mod table;
pub mod text;

use serde::Deserialize;

use crate::error::ExportError;
use crate::styles::ExportStyles;
use crate::table::ReportTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Docx,
    Text,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Text => "text/plain; charset=utf-8",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Docx => "report.docx",
            Self::Text => "report.txt",
        }
    }
}

/// Render `table` in the requested format. Empty reports are refused.
pub fn export(table: &ReportTable, format: ExportFormat, styles: &ExportStyles) -> Result<Vec<u8>, ExportError> {
    if table.is_empty() {
        return Err(ExportError::NoRows);
    }
    let bytes = match format {
        ExportFormat::Docx => docx::generate_docx(table, styles)?,
        ExportFormat::Text => text::render_text(table, styles)?.into_bytes(),
    };
    tracing::info!(format = ?format, rows = table.rows.len(), bytes = bytes.len(), "report exported");
    Ok(bytes)
}
