//! Reminder preferences and the platform scheduler contract.
//!
//! The application keeps at most one scheduled reminder: applying a new
//! preference set always cancels the previous schedule first.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::StoreResult;
use crate::storage::{KeyValueStore, StorageKey};

/// Identifier shared by every scheduled reminder.
pub const REMINDER_ID: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    Daily,
    Weekly,
    Monthly,
    Custom,
}

/// User-chosen reminder settings, persisted alongside the domain state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub frequency: ReminderFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_date: Option<NaiveDate>,
    pub custom_time: NaiveTime,
    pub message: String,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: ReminderFrequency::Daily,
            custom_date: None,
            custom_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
            message: "Time to check your savings goals!".into(),
        }
    }
}

/// What the platform should schedule: one reminder, optionally repeating.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRequest {
    pub id: u32,
    pub at: DateTime<Utc>,
    pub repeat: Option<ReminderFrequency>,
    pub message: String,
}

/// Platform notification contract the embedding shell implements.
pub trait ReminderScheduler {
    fn schedule(&self, request: ReminderRequest) -> StoreResult<()>;
    fn cancel(&self, id: u32) -> StoreResult<()>;
}

/// Next instant the reminder should fire, or `None` when nothing is due:
/// disabled preferences, or a custom date that is absent or already past.
/// Repeating frequencies fire at the preference time, bumped to tomorrow
/// when today's slot has already passed.
pub fn next_trigger(
    prefs: &NotificationPreferences,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if !prefs.enabled {
        return None;
    }
    match prefs.frequency {
        ReminderFrequency::Custom => {
            let date = prefs.custom_date?;
            let at = date.and_time(prefs.custom_time).and_utc();
            (at > now).then_some(at)
        }
        _ => {
            let mut at = now.date_naive().and_time(prefs.custom_time).and_utc();
            if at <= now {
                at += Duration::days(1);
            }
            Some(at)
        }
    }
}

/// Replaces any existing schedule with one matching the preferences.
pub fn apply_schedule(
    scheduler: &dyn ReminderScheduler,
    prefs: &NotificationPreferences,
    now: DateTime<Utc>,
) -> StoreResult<()> {
    scheduler.cancel(REMINDER_ID)?;
    let Some(at) = next_trigger(prefs, now) else {
        return Ok(());
    };
    let repeat = match prefs.frequency {
        ReminderFrequency::Custom => None,
        frequency => Some(frequency),
    };
    scheduler.schedule(ReminderRequest {
        id: REMINDER_ID,
        at,
        repeat,
        message: prefs.message.clone(),
    })
}

/// Loads stored preferences, degrading to defaults on absence or corruption.
pub fn load_preferences(kv: &dyn KeyValueStore) -> NotificationPreferences {
    match kv.get(StorageKey::NotificationPrefs) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!(%err, "corrupt notification preferences, using defaults");
            NotificationPreferences::default()
        }),
        Ok(None) => NotificationPreferences::default(),
        Err(err) => {
            warn!(%err, "failed to read notification preferences, using defaults");
            NotificationPreferences::default()
        }
    }
}

pub fn save_preferences(
    kv: &dyn KeyValueStore,
    prefs: &NotificationPreferences,
) -> StoreResult<()> {
    let json = serde_json::to_string(prefs)?;
    kv.set(StorageKey::NotificationPrefs, &json)
}
