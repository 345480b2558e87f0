use std::time::Duration;

use aws_sdk_s3::Client;
use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_core::error::CoreError;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::keys;
use crate::objects::Bucket;
use crate::store::{DocumentStore, Snapshot, SnapshotStream, SNAPSHOT_BUFFER};

/// A document store backed by one S3 bucket.
///
/// S3 has no change feed, so live subscriptions poll the range query and
/// emit when the result differs from the last delivered snapshot.
#[derive(Clone)]
pub struct S3Store {
    bucket: Bucket,
    poll_interval: Duration,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, poll_interval: Duration) -> Self {
        Self {
            bucket: Bucket::new(client, bucket),
            poll_interval,
        }
    }

    fn parse_body(body: &[u8]) -> Result<Map<String, Value>, StoreError> {
        match serde_json::from_slice(body)? {
            Value::Object(data) => Ok(data),
            _ => Err(StoreError::Document(CoreError::NotAnObject)),
        }
    }
}

impl DocumentStore for S3Store {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let key = keys::document(collection, id)?;
        let body = self
            .bucket
            .get(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        Ok(Document::new(id, Self::parse_body(&body)?))
    }

    async fn put(&self, collection: &str, doc: &Document) -> Result<(), StoreError> {
        let key = keys::document(collection, &doc.id)?;
        let body = serde_json::to_vec(&doc.data)?;
        self.bucket.put_json(&key, body).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let key = keys::document(collection, id)?;
        // DeleteObject succeeds on absent keys.
        if !self.bucket.exists(&key).await? {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.bucket.delete(&key).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let prefix = keys::collection_prefix(collection);
        let mut object_keys = self.bucket.list_keys(&prefix).await?;
        object_keys.sort();

        let mut docs = Vec::with_capacity(object_keys.len());
        for key in &object_keys {
            let Some(id) = keys::document_id(collection, key) else {
                continue;
            };
            // Deleted between list and get.
            let Some(body) = self.bucket.get(key).await? else {
                continue;
            };
            match Self::parse_body(&body) {
                Ok(data) => docs.push(Document::new(id, data)),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable document"),
            }
        }
        Ok(docs)
    }

    async fn subscribe_range(
        &self,
        collection: &str,
        field: &str,
        range: TimestampRange,
    ) -> Result<SnapshotStream, StoreError> {
        let initial = self.query_range(collection, field, range).await?;

        let (tx, rx) = mpsc::channel::<Snapshot>(SNAPSHOT_BUFFER);
        let store = self.clone();
        let collection = collection.to_string();
        let field = field.to_string();

        info!(
            bucket = %self.bucket.name(),
            collection = %collection,
            poll_secs = self.poll_interval.as_secs_f64(),
            "s3 subscription started"
        );

        tokio::spawn(async move {
            let mut last = initial;
            if tx.send(last.clone()).await.is_err() {
                return;
            }

            let mut ticker = tokio::time::interval(store.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial snapshot covers it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = ticker.tick() => {
                        match store.query_range(&collection, &field, range).await {
                            Ok(snapshot) if snapshot != last => {
                                last = snapshot.clone();
                                if tx.send(snapshot).await.is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!(collection = %collection, error = %e, "poll failed, retrying next tick");
                            }
                        }
                    }
                }
            }

            debug!(collection = %collection, "s3 subscription closed");
        });

        Ok(SnapshotStream::new(rx))
    }
}
