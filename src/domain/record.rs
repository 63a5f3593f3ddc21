//! Per-jar transaction history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One deposit or withdrawal in a jar's history. Append-only; removed only
/// when the owning jar is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub amount: f64,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Saved,
    Withdrawn,
}
