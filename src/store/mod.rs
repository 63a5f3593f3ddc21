//! In-memory application state and its validated mutators.
//!
//! Every mutator runs the same pipeline: entitlement check, input validation,
//! in-memory apply, then a persistence flush for the touched collections.
//! The flush is part of the mutation result; a failed write surfaces as an
//! error to the caller while the in-memory state stays authoritative for the
//! session (no rollback).

pub mod projection;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::domain::{
    Category, Jar, JarPurpose, JarStyle, Note, NoteColor, RecordKind, TransactionRecord,
};
use crate::entitlement::{
    can_use_feature, limits_for, Feature, LimitKind, SubscriptionTier, Theme, DEFAULT_CURRENCY,
};
use crate::errors::{StoreError, StoreResult};
use crate::storage::{KeyValueStore, PersistenceAdapter};

/// Snapshot of every collection the application tracks.
#[derive(Debug, Default)]
pub struct AppState {
    pub jars: Vec<Jar>,
    pub categories: Vec<Category>,
    pub notes: Vec<Note>,
    pub dark_mode: bool,
    pub theme: Theme,
    pub tier: SubscriptionTier,
    pub last_notification: Option<String>,
    next_id: u64,
}

impl AppState {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Input for creating a jar. `category_id: None` falls back to the first
/// existing category; an empty currency falls back to the default symbol.
#[derive(Debug, Clone, Default)]
pub struct NewJar {
    pub name: String,
    pub target: f64,
    pub currency: String,
    pub category_id: Option<u64>,
    pub target_date: Option<NaiveDate>,
    pub style: Option<JarStyle>,
    pub image_url: Option<String>,
    pub purpose: Option<JarPurpose>,
}

/// Result of a deposit, including the goal-completed signal consumed by
/// presentation for celebratory feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepositOutcome {
    pub new_saved: f64,
    pub goal_completed: bool,
}

/// Owns the in-memory state and coordinates persistence on every mutation.
pub struct SavingsStore {
    state: AppState,
    persistence: PersistenceAdapter,
}

impl SavingsStore {
    /// Loads persisted collections, degrading absent or corrupt keys to
    /// empty defaults, and seeds the id counter past every stored id.
    pub fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        let persistence = PersistenceAdapter::new(kv);
        let jars = persistence.load_jars();
        let categories = persistence.load_categories();
        let notes = persistence.load_notes();
        let next_id = seed_next_id(&jars, &categories, &notes);
        let state = AppState {
            dark_mode: persistence.load_dark_mode(),
            theme: persistence.load_theme(),
            tier: persistence.load_tier(),
            last_notification: persistence.load_last_notification(),
            jars,
            categories,
            notes,
            next_id,
        };
        debug!(
            jars = state.jars.len(),
            categories = state.categories.len(),
            notes = state.notes.len(),
            "savings store opened"
        );
        Self { state, persistence }
    }

    pub fn jars(&self) -> &[Jar] {
        &self.state.jars
    }

    pub fn categories(&self) -> &[Category] {
        &self.state.categories
    }

    pub fn notes(&self) -> &[Note] {
        &self.state.notes
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.state.tier
    }

    pub fn dark_mode(&self) -> bool {
        self.state.dark_mode
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn last_notification(&self) -> Option<&str> {
        self.state.last_notification.as_deref()
    }

    pub fn jar(&self, id: u64) -> Option<&Jar> {
        self.state.jars.iter().find(|jar| jar.id == id)
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.state.categories.iter().find(|cat| cat.id == id)
    }

    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    pub fn create_category(&mut self, name: &str) -> StoreResult<u64> {
        let limits = limits_for(self.state.tier);
        if let Some(max) = limits.max_categories {
            if self.state.categories.len() as u32 >= max {
                return Err(StoreError::LimitExceeded {
                    limit: LimitKind::Categories,
                    max,
                });
            }
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        let id = self.state.allocate_id();
        self.state.categories.push(Category {
            id,
            name: name.to_string(),
            icon: String::new(),
        });
        self.persistence.save_categories(&self.state.categories)?;
        Ok(id)
    }

    pub fn update_category(&mut self, id: u64, new_name: &str) -> StoreResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(StoreError::InvalidInput(
                "category name must not be empty".into(),
            ));
        }
        let category = self
            .state
            .categories
            .iter_mut()
            .find(|cat| cat.id == id)
            .ok_or_else(|| StoreError::InvalidInput("category not found".into()))?;
        category.name = new_name.to_string();
        self.persistence.save_categories(&self.state.categories)
    }

    /// Removes a category and cascades to every jar referencing it, so no
    /// jar with a dangling category id can remain. No-op when absent.
    pub fn delete_category(&mut self, id: u64) -> StoreResult<()> {
        let jars_before = self.state.jars.len();
        self.state.jars.retain(|jar| jar.category_id != id);
        let cascaded = jars_before - self.state.jars.len();

        let categories_before = self.state.categories.len();
        self.state.categories.retain(|cat| cat.id != id);
        if cascaded == 0 && self.state.categories.len() == categories_before {
            return Ok(());
        }
        if cascaded > 0 {
            info!(category = id, jars = cascaded, "category cascade removed jars");
        }
        self.persistence.save_jars(&self.state.jars)?;
        self.persistence.save_categories(&self.state.categories)
    }

    pub fn create_jar(&mut self, new_jar: NewJar) -> StoreResult<u64> {
        let limits = limits_for(self.state.tier);
        if let Some(max) = limits.max_jars {
            if self.state.jars.len() as u32 >= max {
                return Err(StoreError::LimitExceeded {
                    limit: LimitKind::Jars,
                    max,
                });
            }
        }
        let name = new_jar.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("jar name must not be empty".into()));
        }
        if !new_jar.target.is_finite() || new_jar.target <= 0.0 {
            return Err(StoreError::InvalidInput(
                "jar target must be a positive number".into(),
            ));
        }
        let category_id = match new_jar.category_id {
            Some(id) => {
                if self.category(id).is_none() {
                    return Err(StoreError::InvalidInput("category not found".into()));
                }
                id
            }
            None => self
                .state
                .categories
                .first()
                .map(|cat| cat.id)
                .ok_or_else(|| {
                    StoreError::InvalidInput("create a category before adding jars".into())
                })?,
        };
        let currency = if new_jar.currency.trim().is_empty() {
            DEFAULT_CURRENCY.to_string()
        } else {
            new_jar.currency.trim().to_string()
        };
        if let Some(max) = limits.max_currencies {
            let mut symbols: HashSet<&str> =
                self.state.jars.iter().map(|jar| jar.currency.as_str()).collect();
            symbols.insert(&currency);
            if symbols.len() as u32 > max {
                return Err(StoreError::LimitExceeded {
                    limit: LimitKind::Currencies,
                    max,
                });
            }
        }
        let id = self.state.allocate_id();
        self.state.jars.push(Jar {
            id,
            name: name.to_string(),
            target: new_jar.target,
            saved: 0.0,
            withdrawn: 0.0,
            streak: 0,
            currency,
            category_id,
            target_date: new_jar.target_date,
            created_at: Utc::now(),
            style: new_jar.style,
            image_url: new_jar.image_url,
            purpose: new_jar.purpose,
            notes: Vec::new(),
            records: Vec::new(),
        });
        self.persistence.save_jars(&self.state.jars)?;
        Ok(id)
    }

    /// Removes a jar together with its notes and records. No-op when absent.
    pub fn delete_jar(&mut self, id: u64) -> StoreResult<()> {
        let before = self.state.jars.len();
        self.state.jars.retain(|jar| jar.id != id);
        if self.state.jars.len() == before {
            return Ok(());
        }
        self.persistence.save_jars(&self.state.jars)
    }

    /// Adds `amount` to the jar, clamped at the target. The goal-completed
    /// signal fires exactly when the deposit crosses the target, never on
    /// later deposits at a full jar.
    pub fn deposit(&mut self, jar_id: u64, amount: f64) -> StoreResult<DepositOutcome> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(StoreError::InvalidInput(
                "deposit amount must be a positive number".into(),
            ));
        }
        let record_id = self.state.allocate_id();
        let jar = self
            .state
            .jars
            .iter_mut()
            .find(|jar| jar.id == jar_id)
            .ok_or_else(|| StoreError::InvalidInput("jar not found".into()))?;
        let new_saved = (jar.saved + amount).min(jar.target);
        let goal_completed = jar.saved < jar.target && new_saved >= jar.target;
        jar.saved = new_saved;
        jar.streak += 1;
        jar.records.push(TransactionRecord {
            id: record_id,
            kind: RecordKind::Saved,
            amount,
            date: Utc::now(),
        });
        if goal_completed {
            info!(jar = jar_id, "savings goal reached");
        }
        self.persistence.save_jars(&self.state.jars)?;
        Ok(DepositOutcome {
            new_saved,
            goal_completed,
        })
    }

    /// Removes `amount` from the jar, flooring at zero. `withdrawn` grows by
    /// the literal requested amount even when the balance floors, so it can
    /// exceed the net reduction of `saved`.
    pub fn withdraw(&mut self, jar_id: u64, amount: f64) -> StoreResult<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(StoreError::InvalidInput(
                "withdrawal amount must be a positive number".into(),
            ));
        }
        let record_id = self.state.allocate_id();
        let jar = self
            .state
            .jars
            .iter_mut()
            .find(|jar| jar.id == jar_id)
            .ok_or_else(|| StoreError::InvalidInput("jar not found".into()))?;
        jar.saved = (jar.saved - amount).max(0.0);
        jar.withdrawn += amount;
        jar.records.push(TransactionRecord {
            id: record_id,
            kind: RecordKind::Withdrawn,
            amount,
            date: Utc::now(),
        });
        let new_saved = jar.saved;
        self.persistence.save_jars(&self.state.jars)?;
        Ok(new_saved)
    }

    pub fn add_note(&mut self, text: &str, color: NoteColor) -> StoreResult<u64> {
        let limits = limits_for(self.state.tier);
        if let Some(max) = limits.max_sticky_notes {
            if self.state.notes.len() as u32 >= max {
                return Err(StoreError::LimitExceeded {
                    limit: LimitKind::StickyNotes,
                    max,
                });
            }
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput("note text must not be empty".into()));
        }
        let id = self.state.allocate_id();
        self.state.notes.push(Note {
            id,
            text: text.to_string(),
            color,
        });
        self.persistence.save_notes(&self.state.notes)?;
        Ok(id)
    }

    pub fn delete_note(&mut self, id: u64) -> StoreResult<()> {
        let before = self.state.notes.len();
        self.state.notes.retain(|note| note.id != id);
        if self.state.notes.len() == before {
            return Ok(());
        }
        self.persistence.save_notes(&self.state.notes)
    }

    /// Attaches a note to a jar. Jar notes are not count-limited.
    pub fn add_jar_note(&mut self, jar_id: u64, text: &str, color: NoteColor) -> StoreResult<u64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput("note text must not be empty".into()));
        }
        let id = self.state.allocate_id();
        let jar = self
            .state
            .jars
            .iter_mut()
            .find(|jar| jar.id == jar_id)
            .ok_or_else(|| StoreError::InvalidInput("jar not found".into()))?;
        jar.notes.push(Note {
            id,
            text: text.to_string(),
            color,
        });
        self.persistence.save_jars(&self.state.jars)?;
        Ok(id)
    }

    pub fn delete_jar_note(&mut self, jar_id: u64, note_id: u64) -> StoreResult<()> {
        let Some(jar) = self.state.jars.iter_mut().find(|jar| jar.id == jar_id) else {
            return Ok(());
        };
        let before = jar.notes.len();
        jar.notes.retain(|note| note.id != note_id);
        if jar.notes.len() == before {
            return Ok(());
        }
        self.persistence.save_jars(&self.state.jars)
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> StoreResult<()> {
        self.state.dark_mode = dark_mode;
        self.persistence.save_dark_mode(dark_mode)
    }

    /// Applies a theme; premium themes are gated on the free tier.
    pub fn select_theme(&mut self, theme: Theme) -> StoreResult<()> {
        if theme.is_premium() && !can_use_feature(self.state.tier, Feature::AllThemes) {
            return Err(StoreError::FeatureLocked(Feature::AllThemes));
        }
        self.state.theme = theme;
        self.persistence.save_theme(theme)
    }

    pub fn set_tier(&mut self, tier: SubscriptionTier) -> StoreResult<()> {
        self.state.tier = tier;
        self.persistence.save_tier(tier)
    }

    pub fn set_last_notification(&mut self, date: &str) -> StoreResult<()> {
        self.state.last_notification = Some(date.to_string());
        self.persistence.save_last_notification(date)
    }
}

fn seed_next_id(jars: &[Jar], categories: &[Category], notes: &[Note]) -> u64 {
    let mut max_id = 0;
    for jar in jars {
        max_id = max_id.max(jar.id);
        for note in &jar.notes {
            max_id = max_id.max(note.id);
        }
        for record in &jar.records {
            max_id = max_id.max(record.id);
        }
    }
    for category in categories {
        max_id = max_id.max(category.id);
    }
    for note in notes {
        max_id = max_id.max(note.id);
    }
    max_id + 1
}
