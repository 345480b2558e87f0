use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::Json;
use frontdesk_report::dashboard::{week_range, Dashboard};
use frontdesk_report::window;
use frontdesk_storage::store::DocumentStore;
use futures::stream::Stream;

use crate::error::ApiError;
use crate::routes::live;
use crate::state::AppState;

/// Queue summary and weekly trend for the current week.
pub async fn get_dashboard<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Dashboard>, ApiError> {
    let range = week_range(state.today(), &state.timezone)?;
    let dashboard = state.dashboard().snapshot(range).await?;
    Ok(Json(dashboard))
}

pub async fn live_dashboard<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let (publish, rx) = live::latest::<Dashboard>();
    let windows = window::this_week(state.timezone.clone());
    let subscription = state.dashboard().subscribe_rolling(windows, publish).await?;
    Ok(live::events("dashboard", rx, subscription))
}
