use std::future::Future;

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::{scalar_key, Document};
use tokio::sync::mpsc;

use crate::error::StoreError;

/// Buffered snapshots per live subscription before the producer waits.
pub const SNAPSHOT_BUFFER: usize = 16;

/// A full result set at one point in time.
pub type Snapshot = Vec<Document>;

/// Live query results. Each item supersedes the previous one.
///
/// Dropping the stream ends the producing task.
pub struct SnapshotStream {
    rx: mpsc::Receiver<Snapshot>,
}

impl SnapshotStream {
    pub fn new(rx: mpsc::Receiver<Snapshot>) -> Self {
        Self { rx }
    }

    /// The next snapshot, or `None` once the store stops producing.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }
}

/// Query and subscribe primitives over collections of documents.
pub trait DocumentStore: Send + Sync + 'static {
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Document, StoreError>> + Send;

    /// Insert or replace a document.
    fn put(
        &self,
        collection: &str,
        doc: &Document,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove a document. Deleting a missing document fails with
    /// [`StoreError::NotFound`].
    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every document in a collection, ordered by id.
    fn list(&self, collection: &str) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send;

    /// Documents whose `field` equals `value` once stringified.
    fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send {
        async move {
            let docs = self.list(collection).await?;
            Ok(filter_eq(docs, field, value))
        }
    }

    /// Documents whose timestamp `field` lies within `range`, ordered by that
    /// timestamp.
    fn query_range(
        &self,
        collection: &str,
        field: &str,
        range: TimestampRange,
    ) -> impl Future<Output = Result<Vec<Document>, StoreError>> + Send {
        async move {
            let docs = self.list(collection).await?;
            Ok(filter_range(docs, field, range))
        }
    }

    /// Live variant of [`DocumentStore::query_range`]. The current result set
    /// is delivered first, then again each time it changes.
    ///
    /// Fails if the initial query cannot be answered.
    fn subscribe_range(
        &self,
        collection: &str,
        field: &str,
        range: TimestampRange,
    ) -> impl Future<Output = Result<SnapshotStream, StoreError>> + Send;
}

pub fn filter_eq(docs: Vec<Document>, field: &str, value: &str) -> Vec<Document> {
    docs.into_iter()
        .filter(|doc| doc.get(field).and_then(scalar_key).as_deref() == Some(value))
        .collect()
}

/// Keep documents inside `range` and order them by timestamp, then id.
/// Documents without a readable timestamp never match.
pub fn filter_range(docs: Vec<Document>, field: &str, range: TimestampRange) -> Vec<Document> {
    let mut matched: Vec<_> = docs
        .into_iter()
        .filter_map(|doc| {
            let ts = doc.timestamp(field)?;
            range.contains(ts).then_some((ts, doc))
        })
        .collect();
    matched.sort_by(|(a_ts, a), (b_ts, b)| a_ts.cmp(b_ts).then_with(|| a.id.cmp(&b.id)));
    matched.into_iter().map(|(_, doc)| doc).collect()
}
