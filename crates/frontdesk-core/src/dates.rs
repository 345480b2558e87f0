use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

use crate::error::CoreError;

/// An inclusive timestamp range. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampRange {
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

impl TimestampRange {
    pub fn between(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse two "date-like" strings into an inclusive range.
    ///
    /// Ordering is not validated: a start after the end is a legal, empty
    /// range.
    pub fn parse(start: &str, end: &str) -> Result<Self, CoreError> {
        Ok(Self::between(parse_date_like(start)?, parse_date_like(end)?))
    }

    /// Every instant of `date` in `tz`, from local midnight up to (but not
    /// including) the next local midnight.
    pub fn day(date: Date, tz: &TimeZone) -> Result<Self, CoreError> {
        let start = date.to_zoned(tz.clone())?.timestamp();
        let next = date.tomorrow()?.to_zoned(tz.clone())?.timestamp();
        let end = next.checked_sub(SignedDuration::from_nanos(1))?;
        Ok(Self::between(start, end))
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start.is_none_or(|start| ts >= start) && self.end.is_none_or(|end| ts <= end)
    }
}

/// Parse a date boundary.
///
/// Accepts a full RFC 3339 timestamp (`2024-03-01T08:30:00Z`) or a civil date
/// (`2024-03-01`), which is taken as midnight UTC.
pub fn parse_date_like(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }
    let date: Date = raw
        .parse()
        .map_err(|_| CoreError::InvalidDate(raw.to_string()))?;
    Ok(date.to_zoned(TimeZone::UTC)?.timestamp())
}
