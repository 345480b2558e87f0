use std::sync::Arc;

use frontdesk_core::collections::{self, field};
use frontdesk_core::document::Document;
use frontdesk_core::mapping::FieldMapping;
use frontdesk_storage::store::DocumentStore;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::join;
use crate::live::{self, Subscription};
use crate::projection::project_record;
use crate::request::ReportRequest;
use crate::row::ProjectedRow;

pub type ReportSubscription = Subscription;

/// Projects queue records in a date range onto caller-selected fields.
///
/// The engine holds only the store and the immutable field mapping. Live
/// subscriptions are owned by the caller through the returned handle; the
/// engine does not track them.
pub struct ReportEngine<S> {
    store: Arc<S>,
    mapping: Arc<FieldMapping>,
}

impl<S> Clone for ReportEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            mapping: Arc::clone(&self.mapping),
        }
    }
}

impl<S: DocumentStore> ReportEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_mapping(store, FieldMapping::standard())
    }

    pub fn with_mapping(store: Arc<S>, mapping: FieldMapping) -> Self {
        Self {
            store,
            mapping: Arc::new(mapping),
        }
    }

    /// One-shot report over the current store contents.
    pub async fn fetch_report_data(&self, request: &ReportRequest) -> Result<Vec<ProjectedRow>, ReportError> {
        let records = self
            .store
            .query_range(collections::QUEUE, field::TIMESTAMP, request.range)
            .await
            .map_err(ReportError::Query)?;

        Ok(project_snapshot(&*self.store, &self.mapping, &request.fields, records).await)
    }

    /// Live report. `callback` receives the complete row set for the range
    /// right away and again after every change to it.
    ///
    /// Fails with [`ReportError::Subscription`] when the store cannot answer
    /// the initial query; the callback is then never invoked.
    pub async fn fetch_report_data_realtime<F>(
        &self,
        request: ReportRequest,
        callback: F,
    ) -> Result<ReportSubscription, ReportError>
    where
        F: FnMut(Vec<ProjectedRow>) + Send + 'static,
    {
        let stream = self
            .store
            .subscribe_range(collections::QUEUE, field::TIMESTAMP, request.range)
            .await
            .map_err(ReportError::Subscription)?;

        info!(fields = ?request.fields, "live report subscribed");

        let store = Arc::clone(&self.store);
        let mapping = Arc::clone(&self.mapping);
        let fields = Arc::new(request.fields);

        let transform = move |records: Vec<Document>| {
            let store = Arc::clone(&store);
            let mapping = Arc::clone(&mapping);
            let fields = Arc::clone(&fields);
            async move {
                let rows = project_snapshot(&*store, &mapping, &fields, records).await;
                debug!(rows = rows.len(), "report snapshot projected");
                rows
            }
        };

        Ok(live::spawn(stream, transform, callback))
    }
}

/// Project a whole snapshot, joining employee fields when they were asked
/// for. Row order follows record order.
pub async fn project_snapshot<S: DocumentStore>(
    store: &S,
    mapping: &FieldMapping,
    fields: &[String],
    records: Vec<Document>,
) -> Vec<ProjectedRow> {
    let mut rows: Vec<ProjectedRow> = records
        .iter()
        .map(|record| project_record(mapping, fields, record))
        .collect();

    if join::wants_employee_fields(fields) {
        join::enrich(store, &records, &mut rows, fields).await;
    }

    rows
}
