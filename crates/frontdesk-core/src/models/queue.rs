use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::collections::field;
use crate::document::Document;
use crate::error::CoreError;

/// Where a patient is in the front desk queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum QueueStatus {
    #[serde(rename = "waiting")]
    Waiting,
    #[serde(rename = "being attended")]
    BeingAttended,
    #[serde(rename = "completed")]
    Completed,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::BeingAttended => "being attended",
            Self::Completed => "completed",
        }
    }

    /// Status of a stored queue entry. Missing or unknown values are `None`.
    pub fn of(doc: &Document) -> Option<Self> {
        doc.get(field::STATUS)?.as_str()?.parse().ok()
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Self::Waiting),
            "being attended" => Ok(Self::BeingAttended),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Clinical data entered at the end of a consultation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsultationData {
    #[serde(default)]
    pub diagnosis: Vec<String>,
    #[serde(default)]
    pub medicines: Vec<String>,
    #[serde(default)]
    pub amount: f64,
    /// Medical certificate issued.
    #[serde(default)]
    pub mc: bool,
}

/// A patient's entry in the queue. One per visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QueueEntry {
    #[serde(rename = "employeeID")]
    pub employee_id: String,
    pub status: QueueStatus,
    #[serde(rename = "queueNumber")]
    pub queue_number: u32,
    pub timestamp: jiff::Timestamp,
    #[serde(
        rename = "consultationData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub consultation_data: Option<ConsultationData>,
}
