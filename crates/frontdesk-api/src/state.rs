use std::sync::Arc;

use frontdesk_core::dates::TimestampRange;
use frontdesk_export::styles::ExportStyles;
use frontdesk_report::board::QueueBoardFeed;
use frontdesk_report::dashboard::DashboardFeed;
use frontdesk_report::engine::ReportEngine;
use frontdesk_storage::store::DocumentStore;
use jiff::tz::TimeZone;
use jiff::Timestamp;

use crate::error::ApiError;

/// Shared application state, injected into all route handlers via Axum state.
pub struct AppState<S> {
    pub store: Arc<S>,
    pub reports: ReportEngine<S>,
    pub timezone: TimeZone,
    pub export_styles: Arc<ExportStyles>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            reports: self.reports.clone(),
            timezone: self.timezone.clone(),
            export_styles: Arc::clone(&self.export_styles),
        }
    }
}

impl<S: DocumentStore> AppState<S> {
    pub fn new(store: Arc<S>, timezone: TimeZone) -> Self {
        Self {
            reports: ReportEngine::new(Arc::clone(&store)),
            store,
            timezone,
            export_styles: Arc::new(ExportStyles::default()),
        }
    }

    pub fn dashboard(&self) -> DashboardFeed<S> {
        DashboardFeed::new(Arc::clone(&self.store), self.timezone.clone())
    }

    pub fn board(&self) -> QueueBoardFeed<S> {
        QueueBoardFeed::new(Arc::clone(&self.store))
    }

    /// The current calendar day in the clinic time zone.
    pub fn today(&self) -> jiff::civil::Date {
        Timestamp::now().to_zoned(self.timezone.clone()).date()
    }

    pub fn today_range(&self) -> Result<TimestampRange, ApiError> {
        Ok(TimestampRange::day(self.today(), &self.timezone)?)
    }
}
