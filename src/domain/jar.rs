//! Domain types representing savings jars.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::note::Note;
use crate::domain::record::TransactionRecord;

/// A single savings goal with its accumulated progress and history.
///
/// Invariant: `0 <= saved <= target`. Deposits clamp at the target and
/// withdrawals floor at zero; `withdrawn` accumulates the literal requested
/// amount of every withdrawal regardless of the floor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Jar {
    pub id: u64,
    pub name: String,
    pub target: f64,
    pub saved: f64,
    pub withdrawn: f64,
    pub streak: u32,
    pub currency: String,
    pub category_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<JarStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<JarPurpose>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub records: Vec<TransactionRecord>,
}

impl Jar {
    /// Amount still missing toward the target.
    pub fn remaining(&self) -> f64 {
        (self.target - self.saved).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.saved >= self.target
    }
}

/// Visual selector for how a jar card is rendered. Presentation-only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JarStyle {
    Classic,
    Rounded,
    Slim,
}

/// Tags the intent of a jar; debt jars invert the progress colour scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JarPurpose {
    Saving,
    Debt,
}
