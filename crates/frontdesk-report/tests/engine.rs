use std::sync::{Arc, Mutex};
use std::time::Duration;

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_report::engine::{ReportEngine, ReportSubscription};
use frontdesk_report::error::ReportError;
use frontdesk_report::request::ReportRequest;
use frontdesk_report::row::{CellValue, ProjectedRow};
use frontdesk_storage::error::StoreError;
use frontdesk_storage::memory::MemoryStore;
use frontdesk_storage::store::{DocumentStore, SnapshotStream};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Notify};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);
const QUIET: Duration = Duration::from_millis(100);

async fn put(store: &MemoryStore, collection: &str, id: &str, body: Value) {
    let doc = Document::from_model(id, &body).unwrap();
    store.put(collection, &doc).await.unwrap();
}

async fn seeded() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    put(
        &store,
        "queue",
        "q1",
        json!({
            "employeeID": "E1",
            "timestamp": "2024-03-04T09:00:00Z",
            "consultationData": { "diagnosis": ["Flu", "Cough"], "amount": "25" }
        }),
    )
    .await;
    put(
        &store,
        "employees",
        "emp-1",
        json!({ "employeeID": "E1", "name": "Jane", "department": "HR" }),
    )
    .await;
    Arc::new(store)
}

fn request(start: &str, end: &str) -> ReportRequest {
    ReportRequest::parse(start, end, ["name", "department", "diagnosis", "amount"]).unwrap()
}

fn jane() -> ProjectedRow {
    ProjectedRow::from_iter([
        ("name", CellValue::text("Jane")),
        ("department", CellValue::text("HR")),
        ("diagnosis", CellValue::text("Flu, Cough")),
        ("amount", CellValue::Number(25.0)),
    ])
}

fn collector() -> (
    impl FnMut(Vec<ProjectedRow>) + Send + 'static,
    mpsc::UnboundedReceiver<Vec<ProjectedRow>>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        move |rows| {
            let _ = tx.send(rows);
        },
        rx,
    )
}

#[tokio::test]
async fn end_to_end_example_projects_joined_row() {
    let engine = ReportEngine::new(seeded().await);
    let rows = engine
        .fetch_report_data(&request("2024-03-01", "2024-03-31"))
        .await
        .unwrap();
    assert_eq!(rows, vec![jane()]);
}

#[tokio::test]
async fn reversed_dates_yield_no_rows() {
    let engine = ReportEngine::new(seeded().await);
    let rows = engine
        .fetch_report_data(&request("2024-03-31", "2024-03-01"))
        .await
        .unwrap();
    assert!(rows.is_empty());

    let (callback, mut rx) = collector();
    let _sub = engine
        .fetch_report_data_realtime(request("2024-03-31", "2024-03-01"), callback)
        .await
        .unwrap();
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(vec![]));
}

#[tokio::test]
async fn repeated_queries_are_identical() {
    let engine = ReportEngine::new(seeded().await);
    let req = request("2024-03-01", "2024-03-31");
    let first = engine.fetch_report_data(&req).await.unwrap();
    let second = engine.fetch_report_data(&req).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn live_report_delivers_initial_and_updated_sets() {
    let store = seeded().await;
    let engine = ReportEngine::new(Arc::clone(&store));
    let (callback, mut rx) = collector();

    let _sub = engine
        .fetch_report_data_realtime(request("2024-03-01", "2024-03-31"), callback)
        .await
        .unwrap();
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), Some(vec![jane()]));

    put(
        &store,
        "queue",
        "q2",
        json!({
            "employeeID": "E404",
            "name": "Walk-in",
            "timestamp": "2024-03-05T09:00:00Z",
            "consultationData": { "amount": 10 }
        }),
    )
    .await;

    let rows = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], jane());
    // No employee match: joined cells are blank, not the record's own name.
    assert_eq!(rows[1].get("name"), Some(&CellValue::text("")));
    assert_eq!(rows[1].get("department"), Some(&CellValue::text("")));
    assert_eq!(rows[1].get("amount"), Some(&CellValue::Number(10.0)));
}

#[tokio::test]
async fn cancelled_subscription_stays_silent() {
    let store = seeded().await;
    let engine = ReportEngine::new(Arc::clone(&store));
    let (callback, mut rx) = collector();

    let sub = engine
        .fetch_report_data_realtime(request("2024-03-01", "2024-03-31"), callback)
        .await
        .unwrap();
    assert!(timeout(WAIT, rx.recv()).await.unwrap().is_some());

    sub.cancel();
    sub.cancel();
    assert!(sub.is_cancelled());

    put(&store, "queue", "q3", json!({ "timestamp": "2024-03-06T09:00:00Z" })).await;
    match timeout(QUIET, rx.recv()).await {
        Err(_) | Ok(None) => {}
        Ok(Some(rows)) => panic!("callback invoked after cancel with {rows:?}"),
    }
}

#[tokio::test]
async fn dropping_the_handle_cancels() {
    let store = seeded().await;
    let engine = ReportEngine::new(Arc::clone(&store));
    let (callback, mut rx) = collector();

    let sub = engine
        .fetch_report_data_realtime(request("2024-03-01", "2024-03-31"), callback)
        .await
        .unwrap();
    assert!(timeout(WAIT, rx.recv()).await.unwrap().is_some());
    drop(sub);

    put(&store, "queue", "q3", json!({ "timestamp": "2024-03-06T09:00:00Z" })).await;
    assert!(matches!(timeout(QUIET, rx.recv()).await, Err(_) | Ok(None)));
}

#[tokio::test]
async fn unreachable_store_fails_setup_without_callback() {
    let store = seeded().await;
    store.set_offline(true);
    let engine = ReportEngine::new(Arc::clone(&store));
    let (callback, mut rx) = collector();

    let result = engine
        .fetch_report_data_realtime(request("2024-03-01", "2024-03-31"), callback)
        .await;
    assert!(matches!(result, Err(ReportError::Subscription(_))));
    // The callback was dropped unused.
    assert_eq!(timeout(WAIT, rx.recv()).await.unwrap(), None);
}

#[tokio::test]
async fn failed_employee_lookup_is_a_miss() {
    let store = seeded().await;
    store.fail_collection("employees", true);
    let engine = ReportEngine::new(Arc::clone(&store));

    let rows = engine
        .fetch_report_data(&request("2024-03-01", "2024-03-31"))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&CellValue::text("")));
    assert_eq!(rows[0].get("diagnosis"), Some(&CellValue::text("Flu, Cough")));
}

#[tokio::test]
async fn join_overwrites_record_values() {
    let store = seeded().await;
    put(
        &store,
        "queue",
        "q2",
        json!({
            "employeeID": "E1",
            "name": "stale name",
            "department": "stale dept",
            "timestamp": "2024-03-05T09:00:00Z"
        }),
    )
    .await;
    let engine = ReportEngine::new(Arc::clone(&store));
    let req = ReportRequest::parse("2024-03-01", "2024-03-31", ["Emp ID", "name", "department"]).unwrap();
    let rows = engine.fetch_report_data(&req).await.unwrap();

    for row in &rows {
        assert_eq!(row.get("name"), Some(&CellValue::text("Jane")));
        assert_eq!(row.get("department"), Some(&CellValue::text("HR")));
    }
}

#[tokio::test]
async fn duplicate_labels_collapse() {
    let req = ReportRequest::parse("2024-03-01", "2024-03-31", ["name", "amount", "name"]).unwrap();
    assert_eq!(req.fields, ["name", "amount"]);
}

#[tokio::test]
async fn failed_lookup_blanks_record_name_and_department() {
    let store = MemoryStore::new();
    put(
        &store,
        "queue",
        "q1",
        json!({
            "employeeID": "E9",
            "name": "Walk-in",
            "department": "Ops",
            "timestamp": "2024-03-04T09:00:00Z"
        }),
    )
    .await;
    store.fail_collection("employees", true);
    let engine = ReportEngine::new(Arc::new(store));
    let req = ReportRequest::parse("2024-03-01", "2024-03-31", ["name", "department"]).unwrap();

    let rows = engine.fetch_report_data(&req).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&CellValue::text("")));
    assert_eq!(rows[0].get("department"), Some(&CellValue::text("")));
}

#[tokio::test]
async fn records_without_employee_id_keep_their_values() {
    let store = MemoryStore::new();
    put(
        &store,
        "queue",
        "q1",
        json!({ "name": "Walk-in", "timestamp": "2024-03-04T09:00:00Z" }),
    )
    .await;
    let engine = ReportEngine::new(Arc::new(store));
    let req = ReportRequest::parse("2024-03-01", "2024-03-31", ["name"]).unwrap();

    let rows = engine.fetch_report_data(&req).await.unwrap();
    assert_eq!(rows[0].get("name"), Some(&CellValue::text("Walk-in")));
}

#[tokio::test]
async fn callback_can_cancel_its_own_subscription() {
    let store = seeded().await;
    let engine = ReportEngine::new(Arc::clone(&store));
    let slot: Arc<Mutex<Option<ReportSubscription>>> = Arc::new(Mutex::new(None));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let own = Arc::clone(&slot);
    let sub = engine
        .fetch_report_data_realtime(request("2024-03-01", "2024-03-31"), move |rows| {
            let _ = tx.send(rows);
            // Waits for the handle to be parked, then cancels and drops it.
            loop {
                if let Some(sub) = own.lock().unwrap().take() {
                    sub.cancel();
                    drop(sub);
                    break;
                }
                std::thread::yield_now();
            }
        })
        .await
        .unwrap();
    slot.lock().unwrap().replace(sub);

    assert!(timeout(WAIT, rx.recv()).await.unwrap().is_some());

    put(&store, "queue", "q3", json!({ "timestamp": "2024-03-06T09:00:00Z" })).await;
    assert!(matches!(timeout(QUIET, rx.recv()).await, Err(_) | Ok(None)));

    // The driver task is not wedged on its own gate.
    let rows = timeout(WAIT, engine.fetch_report_data(&request("2024-03-01", "2024-03-31")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rows.len(), 2);
}

/// Holds every employee lookup until released.
struct GatedLookups {
    inner: MemoryStore,
    started: Arc<Notify>,
    release: Arc<Notify>,
}

impl DocumentStore for GatedLookups {
    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn put(&self, collection: &str, doc: &Document) -> Result<(), StoreError> {
        self.inner.put(collection, doc).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection).await
    }

    async fn query_eq(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Document>, StoreError> {
        self.started.notify_one();
        self.release.notified().await;
        self.inner.query_eq(collection, field, value).await
    }

    async fn subscribe_range(
        &self,
        collection: &str,
        field: &str,
        range: TimestampRange,
    ) -> Result<SnapshotStream, StoreError> {
        self.inner.subscribe_range(collection, field, range).await
    }
}

#[tokio::test]
async fn lookup_in_flight_at_cancel_is_discarded() {
    let started = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let inner = seeded().await.as_ref().clone();
    let store = Arc::new(GatedLookups {
        inner,
        started: Arc::clone(&started),
        release: Arc::clone(&release),
    });
    let engine = ReportEngine::new(store);
    let (callback, mut rx) = collector();

    let req = ReportRequest::parse("2024-03-01", "2024-03-31", ["name"]).unwrap();
    let sub = engine.fetch_report_data_realtime(req, callback).await.unwrap();

    timeout(WAIT, started.notified()).await.unwrap();
    sub.cancel();
    release.notify_one();

    match timeout(QUIET, rx.recv()).await {
        Err(_) | Ok(None) => {}
        Ok(Some(rows)) => panic!("joined rows delivered after cancel: {rows:?}"),
    }
}
