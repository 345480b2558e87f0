use std::collections::HashMap;

use crate::collections::field;

/// Report field labels and the storage paths they read from.
///
/// Labels missing from the table are used literally as storage paths, so
/// callers can select ad-hoc dotted paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    entries: HashMap<String, String>,
}

impl FieldMapping {
    /// The labels offered by the report page.
    pub fn standard() -> Self {
        Self::from_pairs([
            ("Emp ID", field::EMPLOYEE_ID),
            ("department", field::DEPARTMENT),
            ("name", field::NAME),
            ("diagnosis", "consultationData.diagnosis"),
            ("medicine", "consultationData.medicines"),
            ("medicines", "consultationData.medicines"),
            ("amount", "consultationData.amount"),
            ("mc", "consultationData.mc"),
            ("MC", "consultationData.mc"),
        ])
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(label, path)| (label.into(), path.into()))
                .collect(),
        }
    }

    /// Storage path for a label: the table entry, else the label itself.
    pub fn storage_path<'a>(&'a self, label: &'a str) -> &'a str {
        self.entries.get(label).map(String::as_str).unwrap_or(label)
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::standard()
    }
}
