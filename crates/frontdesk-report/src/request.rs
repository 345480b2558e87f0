use frontdesk_core::dates::TimestampRange;

use crate::error::ReportError;

/// What to report on: an inclusive timestamp range and the field labels to
/// project, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub range: TimestampRange,
    pub fields: Vec<String>,
}

impl ReportRequest {
    /// Repeated labels keep their first position only.
    pub fn new<I, L>(range: TimestampRange, fields: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in fields {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }
        Self {
            range,
            fields: unique,
        }
    }

    /// Build a request from date-like strings (`2024-03-01` or RFC 3339).
    ///
    /// A start after the end is accepted and simply matches nothing.
    pub fn parse<I, L>(start: &str, end: &str, fields: I) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let range = TimestampRange::parse(start, end).map_err(ReportError::InvalidDate)?;
        Ok(Self::new(range, fields))
    }
}
