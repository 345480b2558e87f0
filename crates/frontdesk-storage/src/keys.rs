//! Object key layout for the S3 store: one JSON object per document at
//! `{collection}/{id}.json`.
//!
//! Pure string functions.

use crate::error::StoreError;

pub fn collection_prefix(collection: &str) -> String {
    format!("{collection}/")
}

pub fn document(collection: &str, id: &str) -> Result<String, StoreError> {
    validate_id(id)?;
    Ok(format!("{collection}/{id}.json"))
}

/// Recover a document id from an object key under `collection`.
pub fn document_id<'a>(collection: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(collection)?
        .strip_prefix('/')?
        .strip_suffix(".json")
        .filter(|id| !id.is_empty() && !id.contains('/'))
}

/// Ids become a single key segment, so they may not be empty or contain `/`.
pub fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id.contains('/') {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}
