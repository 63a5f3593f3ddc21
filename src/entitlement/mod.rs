//! Maps a subscription tier to effective usage limits and answers
//! feature-permission queries. Pure: no state beyond the static tables.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Subscription level governing feature entitlement. Persisted singleton;
/// there is no expiry model once premium is set.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
}

/// Closed set of gated capabilities. Premium unlocks every one of them; the
/// free tier gets none (count ceilings are enforced separately by the store).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    UnlimitedJars,
    UnlimitedCategories,
    UnlimitedHistory,
    AllThemes,
    MultipleCurrencies,
    AdvancedCalculator,
    BackupSync,
    UnlimitedNotes,
    TrendsAnalytics,
    CustomReminders,
    SavingsChallenges,
    NoAds,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::UnlimitedJars,
        Feature::UnlimitedCategories,
        Feature::UnlimitedHistory,
        Feature::AllThemes,
        Feature::MultipleCurrencies,
        Feature::AdvancedCalculator,
        Feature::BackupSync,
        Feature::UnlimitedNotes,
        Feature::TrendsAnalytics,
        Feature::CustomReminders,
        Feature::SavingsChallenges,
        Feature::NoAds,
    ];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Feature::UnlimitedJars => "unlimited jars",
            Feature::UnlimitedCategories => "unlimited categories",
            Feature::UnlimitedHistory => "unlimited history",
            Feature::AllThemes => "premium themes",
            Feature::MultipleCurrencies => "multiple currencies",
            Feature::AdvancedCalculator => "advanced calculator",
            Feature::BackupSync => "backup & sync",
            Feature::UnlimitedNotes => "unlimited notes",
            Feature::TrendsAnalytics => "trends analytics",
            Feature::CustomReminders => "custom reminders",
            Feature::SavingsChallenges => "savings challenges",
            Feature::NoAds => "ad-free experience",
        };
        f.write_str(label)
    }
}

/// Names a free-tier count ceiling for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Jars,
    Categories,
    StickyNotes,
    Currencies,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LimitKind::Jars => "jar",
            LimitKind::Categories => "category",
            LimitKind::StickyNotes => "sticky note",
            LimitKind::Currencies => "currency",
        };
        f.write_str(label)
    }
}

/// Granularities the savings calculator can present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorMode {
    Daily,
    Weekly,
    Monthly,
}

/// Visual themes the shell can apply. Light and dark ship free.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Ocean,
    Forest,
    Sunset,
    Rose,
    Midnight,
    Minimal,
}

impl Theme {
    pub fn is_premium(&self) -> bool {
        !matches!(self, Theme::Light | Theme::Dark)
    }
}

/// Effective usage ceilings for a tier. `None` means unlimited.
#[derive(Debug, Clone, PartialEq)]
pub struct TierLimits {
    pub max_jars: Option<u32>,
    pub max_categories: Option<u32>,
    pub max_sticky_notes: Option<u32>,
    pub max_currencies: Option<u32>,
    pub history_window_days: Option<i64>,
    pub unlocked_themes: Vec<Theme>,
    pub calculator_modes: Vec<CalculatorMode>,
    pub max_reminders: u32,
    pub max_active_challenges: u32,
    pub backup_sync: bool,
}

/// Currency symbol free-tier jars default to.
pub const DEFAULT_CURRENCY: &str = "€";

static FREE_LIMITS: Lazy<TierLimits> = Lazy::new(|| TierLimits {
    max_jars: Some(4),
    max_categories: Some(2),
    max_sticky_notes: Some(3),
    max_currencies: Some(1),
    history_window_days: Some(30),
    unlocked_themes: vec![Theme::Light, Theme::Dark],
    calculator_modes: vec![CalculatorMode::Monthly],
    max_reminders: 0,
    max_active_challenges: 0,
    backup_sync: false,
});

static PREMIUM_LIMITS: Lazy<TierLimits> = Lazy::new(|| TierLimits {
    max_jars: None,
    max_categories: None,
    max_sticky_notes: None,
    max_currencies: None,
    history_window_days: None,
    unlocked_themes: vec![
        Theme::Light,
        Theme::Dark,
        Theme::Ocean,
        Theme::Forest,
        Theme::Sunset,
        Theme::Rose,
        Theme::Midnight,
        Theme::Minimal,
    ],
    calculator_modes: vec![
        CalculatorMode::Daily,
        CalculatorMode::Weekly,
        CalculatorMode::Monthly,
    ],
    max_reminders: 3,
    max_active_challenges: 1,
    backup_sync: true,
});

/// Resolves the effective limits for a tier.
pub fn limits_for(tier: SubscriptionTier) -> &'static TierLimits {
    match tier {
        SubscriptionTier::Free => &FREE_LIMITS,
        SubscriptionTier::Premium => &PREMIUM_LIMITS,
    }
}

/// Yes/no feature query: premium unlocks everything, free unlocks nothing.
pub fn can_use_feature(tier: SubscriptionTier, _feature: Feature) -> bool {
    matches!(tier, SubscriptionTier::Premium)
}
