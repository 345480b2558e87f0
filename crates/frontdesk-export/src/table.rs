use frontdesk_report::row::ProjectedRow;

/// A report laid out for export: one header row of field labels, then one
/// row of cell text per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Headers are the labels uppercased. Cells absent from a row are blank.
    pub fn from_rows(fields: &[String], rows: &[ProjectedRow]) -> Self {
        Self {
            headers: fields.iter().map(|f| f.to_uppercase()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    fields
                        .iter()
                        .map(|f| row.get(f).map(ToString::to_string).unwrap_or_default())
                        .collect()
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
