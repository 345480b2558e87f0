use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::collections;
use crate::document::Document;
use crate::error::CoreError;

/// The editable lookup lists used when entering consultation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CatalogKind {
    Medicines,
    Diagnoses,
}

impl CatalogKind {
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Medicines => collections::MEDICINES,
            Self::Diagnoses => collections::DIAGNOSES,
        }
    }
}

impl FromStr for CatalogKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medicines" => Ok(Self::Medicines),
            "diagnoses" => Ok(Self::Diagnoses),
            other => Err(CoreError::UnknownCatalog(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
}

impl CatalogItem {
    /// Items without a `name` read back with an empty one.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc
                .get(collections::field::NAME)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        }
    }
}
