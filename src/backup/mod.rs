//! Backup export and import.
//!
//! The backup file is a JSON container whose fields carry the raw serialized
//! strings stored under each key, copied verbatim in both directions. That
//! keeps files interchangeable with backups produced by earlier releases.
//! Import restores each present field independently (best-effort): a partial
//! file partially applies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{StoreError, StoreResult};
use crate::storage::{KeyValueStore, StorageKey};

/// On-disk backup document. Each collection field holds the stored string
/// for its key, not a re-parsed structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jars: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<DateTime<Utc>>,
}

/// Snapshots the stored values into a pretty-printed backup document.
pub fn export(kv: &dyn KeyValueStore) -> StoreResult<String> {
    let document = BackupDocument {
        jars: kv.get(StorageKey::Jars)?,
        categories: kv.get(StorageKey::Categories)?,
        notes: kv.get(StorageKey::Notes)?,
        dark_mode: kv.get(StorageKey::DarkMode)?,
        export_date: Some(Utc::now()),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Restores a backup document into the store. Malformed JSON fails with
/// `ImportFormat`; otherwise every present field is written back verbatim.
pub fn import(kv: &dyn KeyValueStore, data: &str) -> StoreResult<BackupDocument> {
    let document: BackupDocument =
        serde_json::from_str(data).map_err(|err| StoreError::ImportFormat(err.to_string()))?;
    if let Some(jars) = &document.jars {
        kv.set(StorageKey::Jars, jars)?;
    }
    if let Some(categories) = &document.categories {
        kv.set(StorageKey::Categories, categories)?;
    }
    if let Some(notes) = &document.notes {
        kv.set(StorageKey::Notes, notes)?;
    }
    if let Some(dark_mode) = &document.dark_mode {
        kv.set(StorageKey::DarkMode, dark_mode)?;
    }
    info!("backup restored");
    Ok(document)
}

/// Suggested file name for a backup exported on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("jarify-backup-{}.json", date.format("%Y-%m-%d"))
}
