use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use frontdesk_core::collections::field;
use frontdesk_core::document::Document;
use frontdesk_core::models::catalog::{CatalogItem, CatalogKind};
use frontdesk_storage::store::DocumentStore;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CatalogName {
    pub name: String,
}

impl CatalogName {
    fn validated(&self) -> Result<&str, ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("name is required".to_string()));
        }
        Ok(name)
    }
}

fn named(id: String, name: &str) -> Document {
    let mut data = Map::new();
    data.insert(field::NAME.to_string(), Value::String(name.to_string()));
    Document::new(id, data)
}

pub async fn list_items<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<CatalogItem>>, ApiError> {
    let kind: CatalogKind = kind.parse()?;
    let docs = state.store.list(kind.collection()).await?;
    Ok(Json(docs.iter().map(CatalogItem::from_document).collect()))
}

pub async fn create_item<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path(kind): Path<String>,
    Json(body): Json<CatalogName>,
) -> Result<(StatusCode, Json<CatalogItem>), ApiError> {
    let kind: CatalogKind = kind.parse()?;
    let doc = named(Uuid::new_v4().to_string(), body.validated()?);
    state.store.put(kind.collection(), &doc).await?;

    tracing::info!(catalog = kind.collection(), id = %doc.id, "catalog item added");
    Ok((StatusCode::CREATED, Json(CatalogItem::from_document(&doc))))
}

pub async fn rename_item<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path((kind, id)): Path<(String, String)>,
    Json(body): Json<CatalogName>,
) -> Result<Json<CatalogItem>, ApiError> {
    let kind: CatalogKind = kind.parse()?;
    let mut doc = state.store.get(kind.collection(), &id).await?;
    doc.data.insert(
        field::NAME.to_string(),
        Value::String(body.validated()?.to_string()),
    );
    state.store.put(kind.collection(), &doc).await?;
    Ok(Json(CatalogItem::from_document(&doc)))
}

pub async fn delete_item<S: DocumentStore>(
    State(state): State<AppState<S>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind: CatalogKind = kind.parse()?;
    state.store.delete(kind.collection(), &id).await?;

    tracing::info!(catalog = kind.collection(), id = %id, "catalog item deleted");
    Ok(StatusCode::NO_CONTENT)
}
