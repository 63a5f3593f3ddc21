//! Key-value persistence backends.

pub mod adapter;
pub mod json_backend;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::StoreResult;

pub use adapter::PersistenceAdapter;
pub use json_backend::{app_data_dir, JsonFileStore};

/// Logical keys the application persists under. Key names match the original
/// on-device store so exported backups stay interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Jars,
    Categories,
    Notes,
    DarkMode,
    LastNotification,
    SubscriptionTier,
    Theme,
    NotificationPrefs,
}

impl StorageKey {
    pub const ALL: [StorageKey; 8] = [
        StorageKey::Jars,
        StorageKey::Categories,
        StorageKey::Notes,
        StorageKey::DarkMode,
        StorageKey::LastNotification,
        StorageKey::SubscriptionTier,
        StorageKey::Theme,
        StorageKey::NotificationPrefs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Jars => "jarify_jars",
            StorageKey::Categories => "jarify_categories",
            StorageKey::Notes => "jarify_notes",
            StorageKey::DarkMode => "jarify_darkMode",
            StorageKey::LastNotification => "jarify_lastNotification",
            StorageKey::SubscriptionTier => "subscription_tier",
            StorageKey::Theme => "app_theme",
            StorageKey::NotificationPrefs => "jarify_notifications",
        }
    }
}

/// Abstraction over persistence backends storing one serialized value per key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>>;
    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()>;
    fn remove(&self, key: StorageKey) -> StoreResult<()>;
}

/// In-memory backend for tests and hosts without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: StorageKey) -> StoreResult<Option<String>> {
        let entries = self.entries.lock().expect("kv mutex poisoned");
        Ok(entries.get(&key).cloned())
    }

    fn set(&self, key: StorageKey, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("kv mutex poisoned");
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> StoreResult<()> {
        let mut entries = self.entries.lock().expect("kv mutex poisoned");
        entries.remove(&key);
        Ok(())
    }
}
