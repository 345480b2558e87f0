use serde::{Deserialize, Serialize};

/// Layout settings shared by the export formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportStyles {
    /// Title printed above the table.
    pub title: String,

    /// Font for body text and table cells.
    pub body_font: String,

    /// Title font size in points.
    pub title_size: usize,

    /// Table text size in points.
    pub body_size: usize,

    /// Table rows per page in the text rendering.
    pub rows_per_page: usize,
}

impl Default for ExportStyles {
    fn default() -> Self {
        Self {
            title: "Report".to_string(),
            body_font: "Calibri".to_string(),
            title_size: 16,
            body_size: 10,
            rows_per_page: 25,
        }
    }
}
