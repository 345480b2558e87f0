//! Front desk dashboard metrics: queue counts by status and a weekly trend
//! of new vs. completed patients.

use std::sync::Arc;

use frontdesk_core::collections::{self, field};
use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_core::error::CoreError;
use frontdesk_core::models::queue::QueueStatus;
use frontdesk_storage::store::DocumentStore;
use jiff::civil::{Date, Weekday};
use jiff::tz::TimeZone;
use jiff::Span;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ReportError;
use crate::live::{self, Subscription, Window};

const WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueueSummary {
    /// Every entry registered in the range ("new patients").
    pub total: usize,
    pub waiting: usize,
    pub being_attended: usize,
    pub completed: usize,
}

impl QueueSummary {
    /// Entries with an unknown status count toward `total` only.
    pub fn from_records(records: &[Document]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for status in records.iter().filter_map(QueueStatus::of) {
            match status {
                QueueStatus::Waiting => summary.waiting += 1,
                QueueStatus::BeingAttended => summary.being_attended += 1,
                QueueStatus::Completed => summary.completed += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeekdayCount {
    pub weekday: String,
    pub new_patients: usize,
    pub completed_patients: usize,
}

/// Monday through Sunday, always seven entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeeklyTrend {
    pub days: Vec<WeekdayCount>,
}

impl WeeklyTrend {
    /// Bucket entries by the weekday of their timestamp in `tz`. Entries
    /// without a readable timestamp are skipped.
    pub fn from_records(records: &[Document], tz: &TimeZone) -> Self {
        let mut days: Vec<WeekdayCount> = WEEK
            .iter()
            .map(|day| WeekdayCount {
                weekday: weekday_name(*day).to_string(),
                new_patients: 0,
                completed_patients: 0,
            })
            .collect();

        for record in records {
            let Some(ts) = record.timestamp(field::TIMESTAMP) else {
                continue;
            };
            let offset = ts.to_zoned(tz.clone()).weekday().to_monday_zero_offset();
            let Some(bucket) = usize::try_from(offset).ok().and_then(|i| days.get_mut(i)) else {
                continue;
            };
            bucket.new_patients += 1;
            if QueueStatus::of(record) == Some(QueueStatus::Completed) {
                bucket.completed_patients += 1;
            }
        }

        Self { days }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Dashboard {
    pub summary: QueueSummary,
    pub weekly: WeeklyTrend,
}

impl Dashboard {
    pub fn from_records(records: &[Document], tz: &TimeZone) -> Self {
        Self {
            summary: QueueSummary::from_records(records),
            weekly: WeeklyTrend::from_records(records, tz),
        }
    }
}

/// Monday 00:00 through Sunday 23:59:59.999999999 of the week holding `day`.
pub fn week_range(day: Date, tz: &TimeZone) -> Result<TimestampRange, CoreError> {
    let back = i64::from(day.weekday().to_monday_zero_offset());
    let monday = day.checked_sub(Span::new().days(back))?;
    let sunday = monday.checked_add(Span::new().days(6))?;
    Ok(TimestampRange {
        start: TimestampRange::day(monday, tz)?.start,
        end: TimestampRange::day(sunday, tz)?.end,
    })
}

/// Dashboard reads and live updates over the queue collection.
pub struct DashboardFeed<S> {
    store: Arc<S>,
    tz: TimeZone,
}

impl<S: DocumentStore> DashboardFeed<S> {
    pub fn new(store: Arc<S>, tz: TimeZone) -> Self {
        Self { store, tz }
    }

    pub async fn snapshot(&self, range: TimestampRange) -> Result<Dashboard, ReportError> {
        let records = self
            .store
            .query_range(collections::QUEUE, field::TIMESTAMP, range)
            .await
            .map_err(ReportError::Query)?;
        Ok(Dashboard::from_records(&records, &self.tz))
    }

    pub async fn subscribe<F>(&self, range: TimestampRange, callback: F) -> Result<Subscription, ReportError>
    where
        F: FnMut(Dashboard) + Send + 'static,
    {
        let stream = self
            .store
            .subscribe_range(collections::QUEUE, field::TIMESTAMP, range)
            .await
            .map_err(ReportError::Subscription)?;

        Ok(live::spawn(stream, self.transform(), callback))
    }

    /// Live dashboard over a window that moves with the clock, e.g.
    /// [`crate::window::this_week`].
    pub async fn subscribe_rolling<W, F>(&self, windows: W, callback: F) -> Result<Subscription, ReportError>
    where
        W: FnMut() -> Result<Window, CoreError> + Send + 'static,
        F: FnMut(Dashboard) + Send + 'static,
    {
        live::subscribe_rolling(Arc::clone(&self.store), windows, self.transform(), callback).await
    }

    fn transform(&self) -> impl FnMut(Vec<Document>) -> std::future::Ready<Dashboard> + Send + 'static {
        let tz = self.tz.clone();
        move |records| std::future::ready(Dashboard::from_records(&records, &tz))
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}
