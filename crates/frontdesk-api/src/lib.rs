//! frontdesk-api
//!
//! HTTP surface for the clinic front desk: reports (one-shot, live and
//! exported), the dashboard, the queue and its TV board, employees and the
//! medicine/diagnosis catalogs.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post, put};
use axum::Router;
use frontdesk_storage::store::DocumentStore;
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the application router over any document store.
pub fn router<S: DocumentStore>(state: AppState<S>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Reports
        .route("/reports", post(routes::reports::create_report::<S>))
        .route("/reports/live", get(routes::reports::live_report::<S>))
        .route("/reports/export", post(routes::reports::export_report::<S>))
        // Dashboard
        .route("/dashboard", get(routes::dashboard::get_dashboard::<S>))
        .route("/dashboard/live", get(routes::dashboard::live_dashboard::<S>))
        // Queue
        .route("/queue", post(routes::queue::register_patient::<S>))
        .route("/queue/board", get(routes::queue::get_board::<S>))
        .route("/queue/board/live", get(routes::queue::live_board::<S>))
        .route("/queue/{id}/status", put(routes::queue::update_status::<S>))
        .route(
            "/queue/{id}/consultation",
            put(routes::queue::update_consultation::<S>),
        )
        // Employees
        .route(
            "/employees",
            get(routes::employees::list_employees::<S>).post(routes::employees::create_employee::<S>),
        )
        .route(
            "/employees/{employee_id}",
            get(routes::employees::get_employee::<S>),
        )
        // Catalogs
        .route(
            "/catalog/{kind}",
            get(routes::catalog::list_items::<S>).post(routes::catalog::create_item::<S>),
        )
        .route(
            "/catalog/{kind}/{id}",
            put(routes::catalog::rename_item::<S>).delete(routes::catalog::delete_item::<S>),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
