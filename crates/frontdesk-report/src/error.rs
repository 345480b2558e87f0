use frontdesk_core::error::CoreError;
use frontdesk_storage::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The live range query could not be established. No rows are delivered.
    #[error("could not establish live query: {0}")]
    Subscription(#[source] StoreError),

    #[error("report query failed: {0}")]
    Query(#[source] StoreError),

    #[error("invalid report dates: {0}")]
    InvalidDate(#[source] CoreError),

    /// Logged and treated as a miss; never aborts a snapshot.
    #[error("employee lookup failed for {employee_id}: {source}")]
    JoinLookup {
        employee_id: String,
        #[source]
        source: StoreError,
    },

    /// Logged; the affected cell projects as empty.
    #[error("field {label:?} cannot be read from path {path:?}: {source}")]
    MalformedField {
        label: String,
        path: String,
        #[source]
        source: CoreError,
    },
}
