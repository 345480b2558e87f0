//! Live subscription driver.
//!
//! One task per subscription pulls snapshots from the store, transforms each
//! into a caller-facing value, and hands it to the callback. Snapshots are
//! processed one at a time in arrival order, so callback invocations never
//! overlap.
//!
//! Rolling subscriptions follow a window that moves with the clock (today,
//! this week): when the window ends the store query is replaced by one for
//! the next window, behind the same handle.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use frontdesk_core::collections::{self, field};
use frontdesk_core::dates::TimestampRange;
use frontdesk_core::error::CoreError;
use frontdesk_storage::store::{DocumentStore, Snapshot, SnapshotStream};
use jiff::{SignedDuration, Timestamp};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ReportError;

/// Delay before retrying a failed re-subscription at a window boundary.
const RESUBSCRIBE_RETRY: Duration = Duration::from_secs(5);

tokio::task_local! {
    /// Gate identity of the subscription whose callback is running.
    static DELIVERING: usize;
}

type Gate = Arc<Mutex<bool>>;

fn gate_id(gate: &Gate) -> usize {
    Arc::as_ptr(gate) as usize
}

/// Owned handle to a running live subscription.
///
/// [`Subscription::cancel`] is idempotent and may be called from anywhere,
/// including the subscription's own callback. Once it returns, the callback
/// is never invoked again; a callback already running on another thread
/// finishes first. Work in flight for the current snapshot is discarded.
/// Dropping the handle cancels.
pub struct Subscription {
    cancel: CancellationToken,
    gate: Gate,
}

impl Subscription {
    pub fn cancel(&self) {
        self.cancel.cancel();

        // Inside our own callback the gate is held further up this stack.
        // The token alone keeps the driver from delivering again.
        let own_callback = DELIVERING
            .try_with(|id| *id == gate_id(&self.gate))
            .unwrap_or(false);
        if own_callback {
            return;
        }

        let mut open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        *open = false;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The range a rolling subscription currently covers and how long until it
/// must be replaced. `expires_in: None` never rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub range: TimestampRange,
    pub expires_in: Option<Duration>,
}

impl Window {
    /// A window over `range` that expires just after its end, seen from `now`.
    pub fn until_end(range: TimestampRange, now: Timestamp) -> Self {
        let expires_in = range.end.map(|end| {
            let left = end.duration_since(now) + SignedDuration::from_nanos(1);
            Duration::try_from(left).unwrap_or(Duration::ZERO)
        });
        Self { range, expires_in }
    }
}

enum Pump {
    Stopped,
    Expired,
}

struct Driver<F> {
    cancel: CancellationToken,
    gate: Gate,
    callback: F,
}

impl<F> Driver<F> {
    fn new(callback: F) -> (Subscription, Self) {
        let cancel = CancellationToken::new();
        let gate = Arc::new(Mutex::new(true));
        let subscription = Subscription {
            cancel: cancel.clone(),
            gate: Arc::clone(&gate),
        };
        (
            subscription,
            Self {
                cancel,
                gate,
                callback,
            },
        )
    }

    /// Deliver snapshots from `stream` until cancelled, the stream ends, or
    /// `expiry` fires.
    async fn pump<T, P, Fut>(
        &mut self,
        stream: &mut SnapshotStream,
        transform: &mut P,
        expiry: Option<Duration>,
    ) -> Pump
    where
        P: FnMut(Snapshot) -> Fut,
        Fut: Future<Output = T>,
        F: FnMut(T),
    {
        let expired = expire_after(expiry);
        tokio::pin!(expired);

        loop {
            let snapshot = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Pump::Stopped,
                _ = &mut expired => return Pump::Expired,
                next = stream.next() => match next {
                    Some(snapshot) => snapshot,
                    None => return Pump::Stopped,
                },
            };

            let output = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Pump::Stopped,
                output = transform(snapshot) => output,
            };

            if !self.deliver(output) {
                return Pump::Stopped;
            }
        }
    }

    fn deliver<T>(&mut self, output: T) -> bool
    where
        F: FnMut(T),
    {
        let open = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if !*open || self.cancel.is_cancelled() {
            return false;
        }
        let callback = &mut self.callback;
        DELIVERING.sync_scope(gate_id(&self.gate), || callback(output));
        drop(open);
        true
    }
}

async fn expire_after(expiry: Option<Duration>) {
    match expiry {
        Some(after) => tokio::time::sleep(after).await,
        None => std::future::pending().await,
    }
}

/// Drive `stream` until cancelled or the store stops producing.
///
/// `transform` may suspend (e.g. for join lookups); its output for one
/// snapshot reaches `callback` as a single value or not at all.
pub fn spawn<T, P, Fut, F>(mut stream: SnapshotStream, mut transform: P, callback: F) -> Subscription
where
    T: Send + 'static,
    P: FnMut(Snapshot) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let (subscription, mut driver) = Driver::new(callback);

    tokio::spawn(async move {
        driver.pump(&mut stream, &mut transform, None).await;
        debug!("live subscription stopped");
    });

    subscription
}

/// Live queue query over a window that `windows` recomputes each time the
/// current one expires.
///
/// Fails with [`ReportError::Subscription`] when the first window cannot be
/// subscribed; later re-subscription failures are logged and retried.
pub async fn subscribe_rolling<S, W, T, P, Fut, F>(
    store: Arc<S>,
    mut windows: W,
    mut transform: P,
    callback: F,
) -> Result<Subscription, ReportError>
where
    S: DocumentStore,
    W: FnMut() -> Result<Window, CoreError> + Send + 'static,
    T: Send + 'static,
    P: FnMut(Snapshot) -> Fut + Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    F: FnMut(T) + Send + 'static,
{
    let window = windows().map_err(ReportError::InvalidDate)?;
    let mut stream = store
        .subscribe_range(collections::QUEUE, field::TIMESTAMP, window.range)
        .await
        .map_err(ReportError::Subscription)?;

    let (subscription, mut driver) = Driver::new(callback);

    tokio::spawn(async move {
        let mut expiry = window.expires_in;
        'windows: loop {
            if let Pump::Stopped = driver.pump(&mut stream, &mut transform, expiry).await {
                break;
            }

            loop {
                let next = match windows() {
                    Ok(next) => next,
                    Err(e) => {
                        warn!(error = %e, "cannot compute next window, stopping");
                        break 'windows;
                    }
                };
                let subscribed = tokio::select! {
                    biased;
                    _ = driver.cancel.cancelled() => break 'windows,
                    result = store.subscribe_range(collections::QUEUE, field::TIMESTAMP, next.range) => result,
                };
                match subscribed {
                    Ok(next_stream) => {
                        info!(start = ?next.range.start, "live window rolled over");
                        stream = next_stream;
                        expiry = next.expires_in;
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "re-subscription failed, retrying");
                        tokio::select! {
                            biased;
                            _ = driver.cancel.cancelled() => break 'windows,
                            _ = tokio::time::sleep(RESUBSCRIBE_RETRY) => {}
                        }
                    }
                }
            }
        }
        debug!("rolling subscription stopped");
    });

    Ok(subscription)
}
