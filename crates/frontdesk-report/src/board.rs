//! TV queue board: who is being served, who is waiting, who is done.

use std::sync::Arc;

use frontdesk_core::collections::{self, field};
use frontdesk_core::dates::TimestampRange;
use frontdesk_core::document::Document;
use frontdesk_core::error::CoreError;
use frontdesk_core::models::queue::QueueStatus;
use frontdesk_storage::store::DocumentStore;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ReportError;
use crate::live::{self, Subscription, Window};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueueBoard {
    pub now_serving: Option<String>,
    pub waiting: Vec<String>,
    pub completed: Vec<String>,
}

impl QueueBoard {
    /// Build the board from entries already ordered by timestamp. The first
    /// entry being attended is the one shown as now serving. Entries without
    /// a queue number are left off.
    pub fn from_records(records: &[Document]) -> Self {
        let mut board = Self::default();
        for record in records {
            let Some(number) = record.key(field::QUEUE_NUMBER) else {
                continue;
            };
            match QueueStatus::of(record) {
                Some(QueueStatus::BeingAttended) if board.now_serving.is_none() => {
                    board.now_serving = Some(number);
                }
                Some(QueueStatus::Waiting) => board.waiting.push(number),
                Some(QueueStatus::Completed) => board.completed.push(number),
                _ => {}
            }
        }
        board
    }

    /// Text to announce when the served number changed since `previous`.
    pub fn announcement(&self, previous: Option<&QueueBoard>) -> Option<String> {
        let current = self.now_serving.as_deref()?;
        let before = previous.and_then(|b| b.now_serving.as_deref());
        (before != Some(current)).then(|| format!("Now serving {current}"))
    }
}

pub struct QueueBoardFeed<S> {
    store: Arc<S>,
}

impl<S: DocumentStore> QueueBoardFeed<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self, range: TimestampRange) -> Result<QueueBoard, ReportError> {
        let records = self
            .store
            .query_range(collections::QUEUE, field::TIMESTAMP, range)
            .await
            .map_err(ReportError::Query)?;
        Ok(QueueBoard::from_records(&records))
    }

    pub async fn subscribe<F>(&self, range: TimestampRange, callback: F) -> Result<Subscription, ReportError>
    where
        F: FnMut(QueueBoard) + Send + 'static,
    {
        let stream = self
            .store
            .subscribe_range(collections::QUEUE, field::TIMESTAMP, range)
            .await
            .map_err(ReportError::Subscription)?;

        Ok(live::spawn(stream, board_of, callback))
    }

    /// Live board over a window that moves with the clock, e.g.
    /// [`crate::window::today`].
    pub async fn subscribe_rolling<W, F>(&self, windows: W, callback: F) -> Result<Subscription, ReportError>
    where
        W: FnMut() -> Result<Window, CoreError> + Send + 'static,
        F: FnMut(QueueBoard) + Send + 'static,
    {
        live::subscribe_rolling(Arc::clone(&self.store), windows, board_of, callback).await
    }
}

fn board_of(records: Vec<Document>) -> std::future::Ready<QueueBoard> {
    std::future::ready(QueueBoard::from_records(&records))
}
