use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use frontdesk_export::table::ReportTable;
use frontdesk_export::ExportFormat;
use frontdesk_report::request::ReportRequest;
use frontdesk_report::row::ProjectedRow;
use frontdesk_storage::store::DocumentStore;
use futures::stream::Stream;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::live;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub start_date: String,
    pub end_date: String,
    pub fields: Vec<String>,
}

/// One-shot report over the current queue records.
pub async fn create_report<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(query): Json<ReportQuery>,
) -> Result<Json<Vec<ProjectedRow>>, ApiError> {
    let request = ReportRequest::parse(&query.start_date, &query.end_date, query.fields)?;
    let rows = state.reports.fetch_report_data(&request).await?;
    Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct LiveReportParams {
    pub start: String,
    pub end: String,
    /// Comma-separated field labels.
    pub fields: String,
}

/// Live report as server-sent `report` events, one per snapshot.
pub async fn live_report<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Query(params): Query<LiveReportParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let fields = params
        .fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty());
    let request = ReportRequest::parse(&params.start, &params.end, fields)?;

    let (publish, rx) = live::latest::<Vec<ProjectedRow>>();
    let subscription = state.reports.fetch_report_data_realtime(request, publish).await?;

    Ok(live::events("report", rx, subscription))
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub start_date: String,
    pub end_date: String,
    pub fields: Vec<String>,
    pub format: ExportFormat,
}

/// Generate the report and return it as a downloadable DOCX or text file.
pub async fn export_report<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, ApiError> {
    let request = ReportRequest::parse(&req.start_date, &req.end_date, req.fields)?;
    let rows = state.reports.fetch_report_data(&request).await?;

    let table = ReportTable::from_rows(&request.fields, &rows);
    let bytes = frontdesk_export::export(&table, req.format, &state.export_styles)?;

    let headers = [
        (header::CONTENT_TYPE, req.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", req.format.file_name()),
        ),
    ];
    Ok((headers, bytes).into_response())
}
