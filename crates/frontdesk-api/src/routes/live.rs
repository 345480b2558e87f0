//! Server-sent event streams over live subscriptions.

use axum::response::sse::{Event, KeepAlive, Sse};
use frontdesk_report::live::Subscription;
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::watch;

/// A callback that publishes each value into a slot holding only the most
/// recent one, and the receiving end of that slot.
///
/// A slow client skips intermediate snapshots instead of buffering them.
pub fn latest<T>() -> (impl FnMut(T) + Send + 'static, watch::Receiver<Option<T>>)
where
    T: Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(None);
    let publish = move |value: T| {
        tx.send_replace(Some(value));
    };
    (publish, rx)
}

/// Stream every published value as an SSE event named `name`.
///
/// The stream owns `subscription`; when the client disconnects the stream is
/// dropped and the subscription cancelled with it.
pub fn events<T>(
    name: &'static str,
    rx: watch::Receiver<Option<T>>,
    subscription: Subscription,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>>
where
    T: Serialize + Clone + Send + Sync + 'static,
{
    let stream = stream::unfold((rx, subscription), move |(mut rx, subscription)| async move {
        loop {
            if rx.changed().await.is_err() {
                return None;
            }
            let latest = rx.borrow_and_update().clone();
            if let Some(value) = latest {
                let event = Event::default().event(name).json_data(&value);
                return Some((event, (rx, subscription)));
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
