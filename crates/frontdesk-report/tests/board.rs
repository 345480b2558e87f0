use std::sync::Arc;
use std::time::Duration;

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_core::error::CoreError;
use frontdesk_report::board::{QueueBoard, QueueBoardFeed};
use frontdesk_report::live::Window;
use frontdesk_storage::memory::MemoryStore;
use frontdesk_storage::store::DocumentStore;
use serde_json::json;
use tokio::sync::mpsc;

fn entry(id: &str, number: u32, minute: u32, status: &str) -> Document {
    Document::from_model(
        id,
        &json!({
            "queueNumber": number,
            "status": status,
            "timestamp": format!("2024-03-04T09:{minute:02}:00Z"),
        }),
    )
    .unwrap()
}

#[test]
fn board_splits_by_status_in_order() {
    let records = vec![
        entry("a", 1, 0, "completed"),
        entry("b", 2, 5, "being attended"),
        entry("c", 3, 10, "waiting"),
        entry("d", 4, 15, "waiting"),
        entry("e", 5, 20, "being attended"),
    ];
    let board = QueueBoard::from_records(&records);
    assert_eq!(board.now_serving.as_deref(), Some("2"));
    assert_eq!(board.waiting, ["3", "4"]);
    assert_eq!(board.completed, ["1"]);
}

#[test]
fn entries_without_numbers_are_skipped() {
    let doc = Document::from_model("x", &json!({ "status": "waiting" })).unwrap();
    assert_eq!(QueueBoard::from_records(&[doc]), QueueBoard::default());
}

#[test]
fn announces_only_changes() {
    let first = QueueBoard { now_serving: Some("7".into()), ..QueueBoard::default() };
    assert_eq!(first.announcement(None).as_deref(), Some("Now serving 7"));
    assert_eq!(first.announcement(Some(&first)), None);

    let next = QueueBoard { now_serving: Some("8".into()), ..QueueBoard::default() };
    assert_eq!(next.announcement(Some(&first)).as_deref(), Some("Now serving 8"));
    assert_eq!(QueueBoard::default().announcement(Some(&first)), None);
}

#[tokio::test]
async fn live_board_follows_status_changes() {
    let store = Arc::new(MemoryStore::new());
    store.put("queue", &entry("a", 1, 0, "waiting")).await.unwrap();
    let feed = QueueBoardFeed::new(Arc::clone(&store));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(TimestampRange::unbounded(), move |board| {
            let _ = tx.send(board);
        })
        .await
        .unwrap();
    assert_eq!(rx.recv().await.unwrap().waiting, ["1"]);

    store.put("queue", &entry("a", 1, 0, "being attended")).await.unwrap();
    let board = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(board.now_serving.as_deref(), Some("1"));
    assert!(board.waiting.is_empty());
}

#[tokio::test(start_paused = true)]
async fn rolling_board_moves_to_the_next_day() {
    let store = Arc::new(MemoryStore::new());
    store.put("queue", &entry("a", 1, 0, "waiting")).await.unwrap();
    let tomorrow = Document::from_model(
        "b",
        &json!({ "queueNumber": 7, "status": "waiting", "timestamp": "2024-03-05T08:00:00Z" }),
    )
    .unwrap();
    store.put("queue", &tomorrow).await.unwrap();
    let feed = QueueBoardFeed::new(Arc::clone(&store));

    let day = |date: &str| TimestampRange::parse(&format!("{date}T00:00:00Z"), &format!("{date}T23:59:59Z")).unwrap();
    let mut days = vec![
        Window { range: day("2024-03-05"), expires_in: None },
        Window { range: day("2024-03-04"), expires_in: Some(Duration::from_secs(1)) },
    ];
    let windows = move || Ok::<_, CoreError>(days.pop().unwrap());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe_rolling(windows, move |board: QueueBoard| {
            let _ = tx.send(board);
        })
        .await
        .unwrap();

    assert_eq!(rx.recv().await.unwrap().waiting, ["1"]);

    let next = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.waiting, ["7"]);
}

#[test]
fn window_expires_just_after_its_end() {
    let range = TimestampRange::parse("2024-03-04T00:00:00Z", "2024-03-04T23:59:59Z").unwrap();
    let now = "2024-03-04T23:59:00Z".parse().unwrap();
    let window = Window::until_end(range, now);
    assert_eq!(
        window.expires_in,
        Some(Duration::from_secs(59) + Duration::from_nanos(1))
    );

    let late = "2024-03-05T01:00:00Z".parse().unwrap();
    assert_eq!(Window::until_end(range, late).expires_in, Some(Duration::ZERO));
    assert_eq!(
        Window::until_end(TimestampRange::unbounded(), now).expires_in,
        None
    );
}
