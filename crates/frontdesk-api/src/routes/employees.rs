use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use frontdesk_core::collections::{self, field};
use frontdesk_core::document::Document;
use frontdesk_core::models::employee::EmployeeRecord;
use frontdesk_storage::error::StoreError;
use frontdesk_storage::store::DocumentStore;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_employees<S: DocumentStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<EmployeeRecord>>, ApiError> {
    let docs = state.store.list(collections::EMPLOYEES).await?;

    let mut employees = Vec::with_capacity(docs.len());
    for doc in &docs {
        employees.push(doc.to_model::<EmployeeRecord>()?);
    }

    Ok(Json(employees))
}

pub async fn get_employee<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeRecord>, ApiError> {
    let docs = state
        .store
        .query_eq(collections::EMPLOYEES, field::EMPLOYEE_ID, &employee_id)
        .await?;
    let doc = docs
        .first()
        .ok_or_else(|| ApiError::NotFound(format!("employee {employee_id} not found")))?;
    Ok(Json(doc.to_model()?))
}

/// Register an employee. The employee id doubles as the document id, so each
/// id can be registered once.
pub async fn create_employee<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Json(mut employee): Json<EmployeeRecord>,
) -> Result<(StatusCode, Json<EmployeeRecord>), ApiError> {
    employee.employee_id = employee.employee_id.trim().to_string();
    employee.name = employee.name.trim().to_string();
    if employee.employee_id.is_empty() || employee.name.is_empty() {
        return Err(ApiError::BadRequest("employeeID and name are required".to_string()));
    }

    match state
        .store
        .get(collections::EMPLOYEES, &employee.employee_id)
        .await
    {
        Ok(_) => {
            return Err(ApiError::Conflict(format!(
                "employee {} already registered",
                employee.employee_id
            )));
        }
        Err(StoreError::NotFound { .. }) => {}
        Err(e) => return Err(e.into()),
    }

    let doc = Document::from_model(employee.employee_id.clone(), &employee)?;
    state.store.put(collections::EMPLOYEES, &doc).await?;

    tracing::info!(employee_id = %employee.employee_id, "employee registered");
    Ok((StatusCode::CREATED, Json(employee)))
}
