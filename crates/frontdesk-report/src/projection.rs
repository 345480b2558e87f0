//! Record → row projection.
//!
//! Each selected label is mapped to a storage path (table entry, else the
//! label itself), resolved against the record, and rendered:
//!
//! - `amount` is numeric; anything missing or unparseable becomes `0`.
//! - A nested `diagnosis`/`medicines` sequence is flattened into one
//!   comma-joined string. Strings are kept as-is; objects contribute their
//!   `name` (else `value`), and empty results are dropped.
//! - Everything else is stringified; missing values become `""`.

use frontdesk_core::collections::field;
use frontdesk_core::document::Document;
use frontdesk_core::mapping::FieldMapping;
use frontdesk_core::path::{FieldValue, StoragePath};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ReportError;
use crate::row::{format_number, CellValue, ProjectedRow};

const LIST_SEPARATOR: &str = ", ";

/// Project one record onto the selected labels, in order.
pub fn project_record(mapping: &FieldMapping, fields: &[String], record: &Document) -> ProjectedRow {
    fields
        .iter()
        .map(|label| (label.as_str(), project_field(mapping, label, &record.data)))
        .collect()
}

/// Project a single label from a document body.
pub fn project_field(mapping: &FieldMapping, label: &str, body: &Map<String, Value>) -> CellValue {
    let raw = mapping.storage_path(label);
    let resolved = StoragePath::parse(raw).and_then(|path| {
        let value = path.resolve(body)?;
        Ok((path, value))
    });

    let (path, value) = match resolved {
        Ok(found) => found,
        Err(source) => {
            let err = ReportError::MalformedField {
                label: label.to_string(),
                path: raw.to_string(),
                source,
            };
            debug!(error = %err, "projecting empty cell");
            return empty_cell(label);
        }
    };

    if label == field::AMOUNT {
        return CellValue::Number(coerce_number(value));
    }

    match value {
        Some(FieldValue::Sequence(items)) if path.is_nested() && is_list_leaf(path.leaf()) => {
            CellValue::Text(join_list(items))
        }
        Some(value) => CellValue::Text(stringify(value)),
        None => CellValue::Text(String::new()),
    }
}

/// The value a label projects to when nothing can be read for it.
pub fn empty_cell(label: &str) -> CellValue {
    if label == field::AMOUNT {
        CellValue::Number(0.0)
    } else {
        CellValue::Text(String::new())
    }
}

fn is_list_leaf(leaf: &str) -> bool {
    leaf == field::DIAGNOSIS || leaf == field::MEDICINES
}

pub fn coerce_number(value: Option<FieldValue<'_>>) -> f64 {
    let n = match value {
        Some(FieldValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(FieldValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        Some(FieldValue::Bool(b)) => f64::from(u8::from(b)),
        Some(FieldValue::Sequence(_)) | Some(FieldValue::Object(_)) | None => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

pub fn stringify(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Text(s) => s.to_string(),
        FieldValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(format_number).unwrap_or_default()
            }
        }
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Sequence(items) => join_list(items),
        FieldValue::Object(obj) => serde_json::to_string(obj).unwrap_or_default(),
    }
}

/// Flatten a sequence into `"a, b, c"`, preserving order.
pub fn join_list(items: &[Value]) -> String {
    items
        .iter()
        .filter_map(list_element)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn list_element(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => named_text(obj, field::NAME)
            .or_else(|| named_text(obj, field::VALUE)),
        other => FieldValue::from_value(other).map(stringify),
    }
}

fn named_text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(FieldValue::from_value)
        .map(stringify)
        .filter(|s| !s.is_empty())
}
