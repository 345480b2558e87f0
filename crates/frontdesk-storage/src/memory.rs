use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use serde_json::{Map, Value};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::keys;
use crate::store::{DocumentStore, Snapshot, SnapshotStream, SNAPSHOT_BUFFER};

type Collection = BTreeMap<String, Map<String, Value>>;

/// An in-process document store with live range subscriptions.
///
/// Every write bumps a change counter; live subscriptions re-run their query
/// on each bump and emit only when the matching set actually changed.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    collections: RwLock<HashMap<String, Collection>>,
    version: watch::Sender<u64>,
    offline: AtomicBool,
    failing: RwLock<HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                collections: RwLock::new(HashMap::new()),
                version,
                offline: AtomicBool::new(false),
                failing: RwLock::new(HashSet::new()),
            }),
        }
    }

    /// Make every operation fail with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Make operations on one collection fail with `StoreError::Unavailable`.
    pub fn fail_collection(&self, collection: &str, failing: bool) {
        let mut set = self
            .inner
            .failing
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if failing {
            set.insert(collection.to_string());
        } else {
            set.remove(collection);
        }
    }

    fn check(&self, collection: &str) -> Result<(), StoreError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".to_string()));
        }
        let failing = self
            .inner
            .failing
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if failing.contains(collection) {
            return Err(StoreError::Unavailable(format!(
                "collection {collection} unavailable"
            )));
        }
        Ok(())
    }

    fn bump(&self) {
        self.inner.version.send_modify(|v| *v += 1);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.check(collection)?;
        let collections = self
            .inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|data| Document::new(id, data.clone()))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn put(&self, collection: &str, doc: &Document) -> Result<(), StoreError> {
        self.check(collection)?;
        keys::validate_id(&doc.id)?;
        {
            let mut collections = self
                .inner
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(doc.id.clone(), doc.data.clone());
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check(collection)?;
        let removed = {
            let mut collections = self
                .inner
                .collections
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            collections
                .get_mut(collection)
                .and_then(|docs| docs.remove(id))
                .is_some()
        };
        if !removed {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.bump();
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.check(collection)?;
        let collections = self
            .inner
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn subscribe_range(
        &self,
        collection: &str,
        field: &str,
        range: TimestampRange,
    ) -> Result<SnapshotStream, StoreError> {
        // Subscribe before the initial query so no write slips between them.
        let mut changes = self.inner.version.subscribe();
        let initial = self.query_range(collection, field, range).await?;

        let (tx, rx) = mpsc::channel::<Snapshot>(SNAPSHOT_BUFFER);
        let store = self.clone();
        let collection = collection.to_string();
        let field = field.to_string();

        tokio::spawn(async move {
            let mut last = initial;
            if tx.send(last.clone()).await.is_err() {
                return;
            }

            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        match store.query_range(&collection, &field, range).await {
                            Ok(snapshot) if snapshot != last => {
                                last = snapshot.clone();
                                if tx.send(snapshot).await.is_err() {
                                    break;
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!(collection = %collection, error = %e, "snapshot refresh failed");
                            }
                        }
                    }
                }
            }

            debug!(collection = %collection, "memory subscription closed");
        });

        Ok(SnapshotStream::new(rx))
    }
}
