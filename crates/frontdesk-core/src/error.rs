use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("malformed storage path: {0:?}")]
    MalformedPath(String),

    #[error("path {path} crosses a non-object value at segment {segment:?}")]
    NotAContainer { path: String, segment: String },

    #[error("invalid queue status: {0}")]
    InvalidStatus(String),

    #[error("unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("time error: {0}")]
    Time(#[from] jiff::Error),
}
