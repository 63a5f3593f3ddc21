//! Pure derivations over the in-memory state, recomputed on every read.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Jar, TransactionRecord};
use crate::entitlement::{limits_for, SubscriptionTier};

/// Progress toward the jar target as a percentage with one decimal place.
/// A zero target reads as 0%; a full jar reads as exactly 100%.
pub fn progress_percent(jar: &Jar) -> f64 {
    if jar.target <= 0.0 {
        return 0.0;
    }
    round1((jar.saved / jar.target * 100.0).min(100.0))
}

/// Saved/target sums across every jar in a category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryAggregate {
    pub saved: f64,
    pub target: f64,
    pub percent: f64,
}

pub fn category_aggregate(jars: &[Jar], category_id: u64) -> CategoryAggregate {
    let mut saved = 0.0;
    let mut target = 0.0;
    for jar in jars.iter().filter(|jar| jar.category_id == category_id) {
        saved += jar.saved;
        target += jar.target;
    }
    let percent = if target > 0.0 {
        round1(saved / target * 100.0)
    } else {
        0.0
    };
    CategoryAggregate {
        saved,
        target,
        percent,
    }
}

/// Grand totals across all jars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub saved: f64,
    pub target: f64,
}

pub fn totals(jars: &[Jar]) -> Totals {
    Totals {
        saved: jars.iter().map(|jar| jar.saved).sum(),
        target: jars.iter().map(|jar| jar.target).sum(),
    }
}

/// Suggested saving pace per calculator granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvestmentPlan {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

/// Pace needed to fill the jar: date-driven when a future target date is
/// set, otherwise a fixed heuristic over a one-month horizon.
pub fn investment_plan(jar: &Jar, today: NaiveDate) -> InvestmentPlan {
    let remaining = jar.remaining();
    if let Some(target_date) = jar.target_date {
        let days = (target_date - today).num_days();
        if days > 0 {
            let days = days as f64;
            return InvestmentPlan {
                daily: remaining / days,
                weekly: remaining / (days / 7.0),
                monthly: remaining / (days / 30.0),
            };
        }
    }
    InvestmentPlan {
        daily: remaining / 30.0,
        weekly: remaining / 4.0,
        monthly: remaining,
    }
}

/// Daily amount needed for an ad-hoc goal; `None` once the date has passed.
pub fn daily_savings_needed(
    target_amount: f64,
    target_date: NaiveDate,
    today: NaiveDate,
) -> Option<f64> {
    let days = (target_date - today).num_days();
    if days > 0 {
        Some(target_amount / days as f64)
    } else {
        None
    }
}

/// One bar-chart point per jar, insertion order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub saved: f64,
    pub withdrawn: f64,
}

pub fn chart_series(jars: &[Jar]) -> Vec<ChartPoint> {
    jars.iter()
        .map(|jar| ChartPoint {
            label: truncate_label(&jar.name),
            saved: jar.saved,
            withdrawn: jar.withdrawn,
        })
        .collect()
}

/// Records visible under the tier's history window: the free tier only sees
/// the trailing 30 days, premium sees everything.
pub fn visible_records<'a>(
    jar: &'a Jar,
    tier: SubscriptionTier,
    now: DateTime<Utc>,
) -> Vec<&'a TransactionRecord> {
    match limits_for(tier).history_window_days {
        Some(days) => jar
            .records
            .iter()
            .filter(|record| (now - record.date).num_days() <= days)
            .collect(),
        None => jar.records.iter().collect(),
    }
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > 10 {
        let cut: String = name.chars().take(10).collect();
        format!("{}...", cut)
    } else {
        name.to_string()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordKind;
    use chrono::Duration;

    fn jar(saved: f64, target: f64) -> Jar {
        Jar {
            id: 1,
            name: "Test".into(),
            target,
            saved,
            withdrawn: 0.0,
            streak: 0,
            currency: "€".into(),
            category_id: 1,
            target_date: None,
            created_at: Utc::now(),
            style: None,
            image_url: None,
            purpose: None,
            notes: Vec::new(),
            records: Vec::new(),
        }
    }

    #[test]
    fn progress_is_zero_for_zero_target() {
        assert_eq!(progress_percent(&jar(0.0, 0.0)), 0.0);
    }

    #[test]
    fn progress_is_exactly_one_hundred_when_full() {
        assert_eq!(progress_percent(&jar(1000.0, 1000.0)), 100.0);
    }

    #[test]
    fn progress_rounds_to_one_decimal() {
        assert_eq!(progress_percent(&jar(1.0, 3.0)), 33.3);
        assert_eq!(progress_percent(&jar(2.0, 3.0)), 66.7);
    }

    #[test]
    fn category_aggregate_sums_matching_jars() {
        let mut first = jar(100.0, 400.0);
        first.category_id = 7;
        let mut second = jar(50.0, 100.0);
        second.category_id = 7;
        let mut other = jar(999.0, 999.0);
        other.category_id = 8;
        let jars = vec![first, second, other];

        let aggregate = category_aggregate(&jars, 7);
        assert_eq!(aggregate.saved, 150.0);
        assert_eq!(aggregate.target, 500.0);
        assert_eq!(aggregate.percent, 30.0);

        let empty = category_aggregate(&jars, 99);
        assert_eq!(empty.percent, 0.0);
    }

    #[test]
    fn investment_plan_follows_the_target_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut jar = jar(0.0, 100.0);
        jar.target_date = Some(today + Duration::days(10));
        let plan = investment_plan(&jar, today);
        assert_eq!(plan.daily, 10.0);
        assert!((plan.weekly - 70.0).abs() < 1e-9);
        assert!((plan.monthly - 300.0).abs() < 1e-9);
    }

    #[test]
    fn investment_plan_falls_back_without_a_future_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut past = jar(40.0, 100.0);
        past.target_date = Some(today - Duration::days(1));
        let plan = investment_plan(&past, today);
        assert_eq!(plan.daily, 2.0);
        assert_eq!(plan.weekly, 15.0);
        assert_eq!(plan.monthly, 60.0);

        let undated = jar(40.0, 100.0);
        assert_eq!(investment_plan(&undated, today), plan);
    }

    #[test]
    fn daily_savings_requires_a_future_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            daily_savings_needed(100.0, today + Duration::days(10), today),
            Some(10.0)
        );
        assert_eq!(daily_savings_needed(100.0, today, today), None);
        assert_eq!(
            daily_savings_needed(100.0, today - Duration::days(3), today),
            None
        );
    }

    #[test]
    fn chart_series_truncates_long_names_in_order() {
        let mut first = jar(10.0, 100.0);
        first.name = "Emergency Savings Fund".into();
        let mut second = jar(5.0, 50.0);
        second.name = "Bike".into();
        second.withdrawn = 2.0;
        let series = chart_series(&[first, second]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Emergency ...");
        assert_eq!(series[1].label, "Bike");
        assert_eq!(series[1].withdrawn, 2.0);
    }

    #[test]
    fn free_tier_history_window_hides_old_records() {
        let now = Utc::now();
        let mut jar = jar(100.0, 200.0);
        jar.records = vec![
            TransactionRecord {
                id: 1,
                kind: RecordKind::Saved,
                amount: 50.0,
                date: now - Duration::days(45),
            },
            TransactionRecord {
                id: 2,
                kind: RecordKind::Saved,
                amount: 50.0,
                date: now - Duration::days(5),
            },
        ];
        let free = visible_records(&jar, SubscriptionTier::Free, now);
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].id, 2);

        let premium = visible_records(&jar, SubscriptionTier::Premium, now);
        assert_eq!(premium.len(), 2);
    }

    #[test]
    fn totals_sum_every_jar() {
        let jars = vec![jar(10.0, 100.0), jar(20.0, 50.0)];
        let totals = totals(&jars);
        assert_eq!(totals.saved, 30.0);
        assert_eq!(totals.target, 150.0);
    }
}
