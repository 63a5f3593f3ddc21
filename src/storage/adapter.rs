//! Typed round-trip between the domain collections and the key-value store.
//!
//! Loads degrade per key: an absent or corrupt value yields the empty default
//! for that key and a warning, never a startup failure. Record timestamps are
//! rehydrated from their stored string form by the chrono serde integration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::domain::{Category, Jar, Note};
use crate::entitlement::{SubscriptionTier, Theme};
use crate::errors::StoreResult;
use crate::storage::{KeyValueStore, StorageKey};

/// Serializes and deserializes the domain collections to and from the store.
pub struct PersistenceAdapter {
    kv: Arc<dyn KeyValueStore>,
}

impl PersistenceAdapter {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &dyn KeyValueStore {
        self.kv.as_ref()
    }

    pub fn load_jars(&self) -> Vec<Jar> {
        self.load_or_default(StorageKey::Jars)
    }

    pub fn load_categories(&self) -> Vec<Category> {
        self.load_or_default(StorageKey::Categories)
    }

    pub fn load_notes(&self) -> Vec<Note> {
        self.load_or_default(StorageKey::Notes)
    }

    pub fn load_dark_mode(&self) -> bool {
        self.load_or_default(StorageKey::DarkMode)
    }

    pub fn load_tier(&self) -> SubscriptionTier {
        self.load_or_default(StorageKey::SubscriptionTier)
    }

    pub fn load_theme(&self) -> Theme {
        self.load_or_default(StorageKey::Theme)
    }

    pub fn load_last_notification(&self) -> Option<String> {
        self.load_or_default(StorageKey::LastNotification)
    }

    pub fn save_jars(&self, jars: &[Jar]) -> StoreResult<()> {
        self.save(StorageKey::Jars, &jars)
    }

    pub fn save_categories(&self, categories: &[Category]) -> StoreResult<()> {
        self.save(StorageKey::Categories, &categories)
    }

    pub fn save_notes(&self, notes: &[Note]) -> StoreResult<()> {
        self.save(StorageKey::Notes, &notes)
    }

    pub fn save_dark_mode(&self, dark_mode: bool) -> StoreResult<()> {
        self.save(StorageKey::DarkMode, &dark_mode)
    }

    pub fn save_tier(&self, tier: SubscriptionTier) -> StoreResult<()> {
        self.save(StorageKey::SubscriptionTier, &tier)
    }

    pub fn save_theme(&self, theme: Theme) -> StoreResult<()> {
        self.save(StorageKey::Theme, &theme)
    }

    pub fn save_last_notification(&self, date: &str) -> StoreResult<()> {
        self.save(StorageKey::LastNotification, &date)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: StorageKey) -> T {
        match self.kv.get(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!(key = key.as_str(), %err, "corrupt stored value, using default");
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(err) => {
                warn!(key = key.as_str(), %err, "failed to read stored value, using default");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: StorageKey, value: &T) -> StoreResult<()> {
        let json = serde_json::to_string(value)?;
        self.kv.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn adapter() -> PersistenceAdapter {
        PersistenceAdapter::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn absent_keys_load_as_defaults() {
        let adapter = adapter();
        assert!(adapter.load_jars().is_empty());
        assert!(adapter.load_categories().is_empty());
        assert!(!adapter.load_dark_mode());
        assert_eq!(adapter.load_tier(), SubscriptionTier::Free);
        assert_eq!(adapter.load_theme(), Theme::Light);
    }

    #[test]
    fn corrupt_value_degrades_to_default() {
        let adapter = adapter();
        adapter.kv().set(StorageKey::Jars, "not json").unwrap();
        assert!(adapter.load_jars().is_empty());
    }

    #[test]
    fn tier_roundtrips_through_the_store() {
        let adapter = adapter();
        adapter.save_tier(SubscriptionTier::Premium).unwrap();
        assert_eq!(adapter.load_tier(), SubscriptionTier::Premium);
        let raw = adapter.kv().get(StorageKey::SubscriptionTier).unwrap();
        assert_eq!(raw.as_deref(), Some("\"premium\""));
    }

    #[test]
    fn record_dates_rehydrate_on_load() {
        use crate::domain::{Jar, RecordKind, TransactionRecord};
        use chrono::Utc;

        let adapter = adapter();
        let stamp = Utc::now();
        let jar = Jar {
            id: 1,
            name: "Car".into(),
            target: 1000.0,
            saved: 500.0,
            withdrawn: 0.0,
            streak: 1,
            currency: "€".into(),
            category_id: 2,
            target_date: None,
            created_at: stamp,
            style: None,
            image_url: None,
            purpose: None,
            notes: Vec::new(),
            records: vec![TransactionRecord {
                id: 3,
                kind: RecordKind::Saved,
                amount: 500.0,
                date: stamp,
            }],
        };
        adapter.save_jars(std::slice::from_ref(&jar)).unwrap();
        let loaded = adapter.load_jars();
        assert_eq!(loaded, vec![jar]);
    }
}
