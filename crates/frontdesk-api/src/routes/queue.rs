use axum::extract::{Path, State};
use axum::response::sse::{Event, Sse};
use axum::Json;
use frontdesk_core::collections::{self, field};
use frontdesk_core::document::Document;
use frontdesk_core::models::queue::{ConsultationData, QueueEntry, QueueStatus};
use frontdesk_report::board::QueueBoard;
use frontdesk_report::window;
use frontdesk_storage::store::DocumentStore;
use futures::stream::Stream;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::live;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterPatient {
    #[serde(rename = "employeeID")]
    pub employee_id: String,
}

/// Put a registered employee in today's queue.
///
/// Queue numbers restart every day in the clinic time zone. Two
/// registrations racing each other can draw the same number.
pub async fn register_patient<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<RegisterPatient>,
) -> Result<Json<Document>, ApiError> {
    let employee_id = req.employee_id.trim();
    if employee_id.is_empty() {
        return Err(ApiError::BadRequest("employeeID is required".to_string()));
    }

    let known = state
        .store
        .query_eq(collections::EMPLOYEES, field::EMPLOYEE_ID, employee_id)
        .await?;
    if known.is_empty() {
        return Err(ApiError::NotFound(format!("employee {employee_id} is not registered")));
    }

    let today = state
        .store
        .query_range(collections::QUEUE, field::TIMESTAMP, state.today_range()?)
        .await?;

    let entry = QueueEntry {
        employee_id: employee_id.to_string(),
        status: QueueStatus::Waiting,
        queue_number: today.len() as u32 + 1,
        timestamp: Timestamp::now(),
        consultation_data: None,
    };
    let doc = Document::from_model(Uuid::new_v4().to_string(), &entry)?;
    state.store.put(collections::QUEUE, &doc).await?;

    tracing::info!(
        id = %doc.id,
        employee_id = %entry.employee_id,
        queue_number = entry.queue_number,
        "patient registered"
    );
    Ok(Json(doc))
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: QueueStatus,
}

pub async fn update_status<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Document>, ApiError> {
    let mut doc = state.store.get(collections::QUEUE, &id).await?;
    doc.data.insert(
        field::STATUS.to_string(),
        Value::String(update.status.as_str().to_string()),
    );
    state.store.put(collections::QUEUE, &doc).await?;

    tracing::info!(id = %id, status = %update.status, "queue status updated");
    Ok(Json(doc))
}

/// Record the outcome of a consultation. The whole block is replaced.
pub async fn update_consultation<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    Json(consultation): Json<ConsultationData>,
) -> Result<Json<Document>, ApiError> {
    if consultation.amount < 0.0 || !consultation.amount.is_finite() {
        return Err(ApiError::BadRequest("amount must be a non-negative number".to_string()));
    }

    let mut doc = state.store.get(collections::QUEUE, &id).await?;
    doc.data.insert(
        field::CONSULTATION_DATA.to_string(),
        serde_json::to_value(&consultation)?,
    );
    state.store.put(collections::QUEUE, &doc).await?;

    tracing::info!(id = %id, mc = consultation.mc, "consultation recorded");
    Ok(Json(doc))
}

/// Today's queue as shown on the waiting room TV.
pub async fn get_board<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<QueueBoard>, ApiError> {
    let board = state.board().snapshot(state.today_range()?).await?;
    Ok(Json(board))
}

#[derive(Debug, Clone, Serialize)]
pub struct BoardUpdate {
    #[serde(flatten)]
    pub board: QueueBoard,
    /// Set when the number being served changed with this update.
    pub announcement: Option<String>,
}

pub async fn live_board<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let (mut publish, rx) = live::latest::<BoardUpdate>();

    let mut previous: Option<QueueBoard> = None;
    let callback = move |board: QueueBoard| {
        let announcement = board.announcement(previous.as_ref());
        previous = Some(board.clone());
        publish(BoardUpdate {
            board,
            announcement,
        });
    };

    // Follows the clinic day across midnight.
    let windows = window::today(state.timezone.clone());
    let subscription = state.board().subscribe_rolling(windows, callback).await?;
    Ok(live::events("board", rx, subscription))
}
