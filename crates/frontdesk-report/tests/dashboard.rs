use std::sync::Arc;
use std::time::Duration;

use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_report::dashboard::{week_range, Dashboard, DashboardFeed, QueueSummary, WeeklyTrend};
use frontdesk_storage::memory::MemoryStore;
use frontdesk_storage::store::DocumentStore;
use jiff::civil::date;
use jiff::tz::TimeZone;
use serde_json::json;
use tokio::sync::mpsc;

fn entry(id: &str, ts: &str, status: &str) -> Document {
    Document::from_model(id, &json!({ "timestamp": ts, "status": status })).unwrap()
}

fn week() -> Vec<Document> {
    vec![
        // 2024-03-04 is a Monday.
        entry("a", "2024-03-04T09:00:00Z", "completed"),
        entry("b", "2024-03-04T10:00:00Z", "waiting"),
        entry("c", "2024-03-06T10:00:00Z", "being attended"),
        entry("d", "2024-03-10T10:00:00Z", "completed"),
        entry("e", "2024-03-10T11:00:00Z", "misfiled"),
    ]
}

#[test]
fn summary_counts_statuses() {
    assert_eq!(
        QueueSummary::from_records(&week()),
        QueueSummary { total: 5, waiting: 1, being_attended: 1, completed: 2 }
    );
}

#[test]
fn weekly_trend_buckets_by_weekday() {
    let trend = WeeklyTrend::from_records(&week(), &TimeZone::UTC);
    assert_eq!(trend.days.len(), 7);
    assert_eq!(trend.days[0].weekday, "Monday");
    assert_eq!((trend.days[0].new_patients, trend.days[0].completed_patients), (2, 1));
    assert_eq!((trend.days[2].new_patients, trend.days[2].completed_patients), (1, 0));
    assert_eq!(trend.days[6].weekday, "Sunday");
    assert_eq!((trend.days[6].new_patients, trend.days[6].completed_patients), (2, 1));
}

#[test]
fn weekday_follows_clinic_time_zone() {
    // 23:30 UTC Monday is already Tuesday in Kuala Lumpur (UTC+8).
    let late = vec![entry("a", "2024-03-04T23:30:00Z", "waiting")];
    let tz = TimeZone::fixed(jiff::tz::offset(8));
    let trend = WeeklyTrend::from_records(&late, &tz);
    assert_eq!(trend.days[1].new_patients, 1);
    assert_eq!(trend.days[0].new_patients, 0);
}

#[test]
fn week_range_spans_monday_to_sunday() {
    let range = week_range(date(2024, 3, 6), &TimeZone::UTC).unwrap();
    let week = TimestampRange::parse("2024-03-04", "2024-03-10T23:59:59Z").unwrap();
    assert_eq!(range.start, week.start);
    assert!(range.contains(week.end.unwrap()));
    assert!(!range.contains("2024-03-11T00:00:00Z".parse().unwrap()));
}

#[tokio::test]
async fn feed_recomputes_on_change() {
    let store = Arc::new(MemoryStore::new());
    for doc in week() {
        store.put("queue", &doc).await.unwrap();
    }
    let feed = DashboardFeed::new(Arc::clone(&store), TimeZone::UTC);
    let range = week_range(date(2024, 3, 6), &TimeZone::UTC).unwrap();

    let snapshot = feed.snapshot(range).await.unwrap();
    assert_eq!(snapshot, Dashboard::from_records(&week(), &TimeZone::UTC));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _sub = feed
        .subscribe(range, move |dashboard| {
            let _ = tx.send(dashboard);
        })
        .await
        .unwrap();
    let first = rx.recv().await.unwrap();
    assert_eq!(first.summary.total, 5);

    store
        .put("queue", &entry("f", "2024-03-05T08:00:00Z", "waiting"))
        .await
        .unwrap();
    let second = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.summary.total, 6);
    assert_eq!(second.summary.waiting, 2);
}
