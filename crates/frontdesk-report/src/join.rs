//! Employee enrichment for `name` / `department` columns.

use std::collections::HashMap;

use frontdesk_core::collections::{self, field};
use frontdesk_core::document::Document;
use frontdesk_core::path::FieldValue;
use frontdesk_storage::store::DocumentStore;
use futures::future::join_all;
use tracing::warn;

use crate::error::ReportError;
use crate::projection::stringify;
use crate::row::{CellValue, ProjectedRow};

const JOINED_FIELDS: [&str; 2] = [field::NAME, field::DEPARTMENT];

pub(crate) fn wants_employee_fields(fields: &[String]) -> bool {
    fields.iter().any(|f| JOINED_FIELDS.contains(&f.as_str()))
}

/// Overwrite `name` / `department` cells from the employee each record
/// points at. Every distinct employee id is looked up once, concurrently.
/// A miss or failed lookup blanks the requested cells; records without an
/// employee id keep their own values.
pub(crate) async fn enrich<S: DocumentStore>(
    store: &S,
    records: &[Document],
    rows: &mut [ProjectedRow],
    fields: &[String],
) {
    let mut ids: Vec<String> = Vec::new();
    for record in records {
        if let Some(id) = employee_id(record)
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return;
    }

    let found = join_all(ids.iter().map(|id| lookup(store, id))).await;
    let employees: HashMap<&str, Document> = ids
        .iter()
        .map(String::as_str)
        .zip(found)
        .filter_map(|(id, doc)| doc.map(|doc| (id, doc)))
        .collect();

    for (record, row) in records.iter().zip(rows.iter_mut()) {
        let Some(id) = employee_id(record) else {
            continue;
        };
        let employee = employees.get(id.as_str());
        for joined in JOINED_FIELDS {
            if fields.iter().any(|f| f == joined) {
                let text = employee.map(|e| text_field(e, joined)).unwrap_or_default();
                row.set(joined, CellValue::Text(text));
            }
        }
    }
}

fn employee_id(record: &Document) -> Option<String> {
    record.key(field::EMPLOYEE_ID).filter(|id| !id.is_empty())
}

async fn lookup<S: DocumentStore>(store: &S, employee_id: &str) -> Option<Document> {
    match store
        .query_eq(collections::EMPLOYEES, field::EMPLOYEE_ID, employee_id)
        .await
    {
        Ok(docs) => docs.into_iter().next(),
        Err(source) => {
            let err = ReportError::JoinLookup {
                employee_id: employee_id.to_string(),
                source,
            };
            warn!(error = %err, "treating employee lookup as a miss");
            None
        }
    }
}

fn text_field(doc: &Document, name: &str) -> String {
    doc.get(name)
        .and_then(FieldValue::from_value)
        .map(stringify)
        .unwrap_or_default()
}
