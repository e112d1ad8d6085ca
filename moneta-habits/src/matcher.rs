//! Reminder matching: decide whether one habit deserves a nudge right now.
//!
//! The matcher consumes patterns, transaction history and per-habit anti-spam
//! state; it never mutates any of them. At most one candidate comes back, the
//! highest-scoring habit that survives its cadence policy.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use moneta_core::{
    days_between, median, minute_of_day, month_start, week_start, weekday_index, Category,
    HabitPattern, HabitReminderState, IntervalType, Transaction,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::merchant::{amount_bucket, merchant_key};

// Hand-tuned policy constants, reproduced exactly; not derived from data.
const NOON_MIN: u32 = 12 * 60;
const EVENING_MIN: u32 = 18 * 60;
const WEEKLY_DOW_PROB_MIN: f64 = 0.4;
const DAILY_DOW_PROB_MIN: f64 = 0.6;
const TIME_GRACE_MIN: u32 = 120;
const MONTHLY_DAY_SLACK: f64 = 7.0;
const MONTHLY_SAMPLE_MAX: usize = 6;
const MONTHLY_SAMPLE_MIN: usize = 3;

/// A reminder the UI may surface; plain serializable data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderCandidate {
    pub habit_id: String,
    pub category: Category,
    pub merchant_label: Option<String>,
    /// The pattern's median amount
    pub suggested_amount: i64,
    pub interval_type: IntervalType,
    pub score: f64,
    pub message: String,
}

/// Pick at most one habit worth reminding about at `now`.
pub fn find_due_reminder(
    patterns: &[HabitPattern],
    transactions: &[Transaction],
    states: &[HabitReminderState],
    now: NaiveDateTime,
) -> Option<ReminderCandidate> {
    let today = now.date();
    let minute = minute_of_day(now);

    let mut best: Option<ReminderCandidate> = None;
    for pattern in patterns {
        // Patterns with neither criterion can never match; dead weight.
        if !pattern.active || !pattern.has_match_key() {
            continue;
        }
        if let Some(state) = states.iter().find(|s| s.habit_id == pattern.habit_id) {
            if state.last_reminded_date == Some(today) {
                continue;
            }
            if state.snoozed_until.is_some_and(|d| d >= today) {
                continue;
            }
        }
        let dates = match_dates(pattern, transactions);
        if dates.binary_search(&today).is_ok() {
            // Already logged today; nothing to nudge.
            continue;
        }
        if !cadence_due(pattern, &dates, today, minute) {
            continue;
        }

        let score = pattern.dow_prob[weekday_index(today)] + pattern.interval_type.score_bonus();
        // Strict greater-than keeps first-seen order on ties.
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(candidate(pattern, score));
        }
    }

    if let Some(c) = &best {
        debug!(habit = %c.habit_id, score = c.score, "reminder due");
    }
    best
}

/// Dates of transactions matching `pattern`, ascending.
fn match_dates(pattern: &HabitPattern, transactions: &[Transaction]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = transactions
        .iter()
        .filter(|t| matches_pattern(pattern, t))
        .map(|t| t.date)
        .collect();
    dates.sort();
    dates
}

fn matches_pattern(pattern: &HabitPattern, txn: &Transaction) -> bool {
    if !txn.is_expense() || txn.category != pattern.category {
        return false;
    }
    match (&pattern.merchant_key, pattern.amount_bucket) {
        (Some(mk), _) => merchant_key(&txn.description).as_deref() == Some(mk.as_str()),
        (None, Some(bucket)) => amount_bucket(txn.amount) == bucket,
        (None, None) => false,
    }
}

fn cadence_due(
    pattern: &HabitPattern,
    match_dates: &[NaiveDate],
    today: NaiveDate,
    minute: u32,
) -> bool {
    let dow = pattern.dow_prob[weekday_index(today)];
    match pattern.interval_type {
        IntervalType::Weekly => {
            if match_dates.iter().any(|d| *d >= week_start(today)) {
                return false;
            }
            if dow < WEEKLY_DOW_PROB_MIN || minute < NOON_MIN {
                return false;
            }
            // Don't remind significantly earlier than the habit's own cadence.
            if let Some(last) = match_dates.last() {
                let required = pattern.interval_days_median.map(|m| m - 1.0).unwrap_or(7.0);
                if (days_between(*last, today) as f64) < required {
                    return false;
                }
            }
            true
        }
        IntervalType::Monthly => {
            if match_dates.iter().any(|d| *d >= month_start(today)) {
                return false;
            }
            if minute < NOON_MIN {
                return false;
            }
            let recent_days: Vec<f64> = match_dates
                .iter()
                .rev()
                .take(MONTHLY_SAMPLE_MAX)
                .map(|d| d.day() as f64)
                .collect();
            let expected = if recent_days.len() >= MONTHLY_SAMPLE_MIN {
                median(&recent_days).unwrap_or(1.0)
            } else {
                1.0
            };
            (today.day() as f64 - expected).abs() <= MONTHLY_DAY_SLACK
        }
        IntervalType::Daily | IntervalType::Unknown => {
            if dow < DAILY_DOW_PROB_MIN {
                return false;
            }
            match (pattern.time_window_start_min, pattern.time_window_end_min) {
                (Some(start), Some(end)) => minute >= start && minute <= end + TIME_GRACE_MIN,
                _ => minute >= EVENING_MIN,
            }
        }
    }
}

fn candidate(pattern: &HabitPattern, score: f64) -> ReminderCandidate {
    let merchant_label = pattern.merchant_key.clone();
    let name = merchant_label
        .as_deref()
        .unwrap_or_else(|| pattern.category.tag());
    let message = format!(
        "Expecting a {name} expense {} (around {}). Log it?",
        pattern.interval_type.hint(),
        pattern.amount_median
    );
    ReminderCandidate {
        habit_id: pattern.habit_id.clone(),
        category: pattern.category,
        merchant_label,
        suggested_amount: pattern.amount_median,
        interval_type: pattern.interval_type,
        score,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_core::TxnType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Wednesday afternoon.
    fn now() -> NaiveDateTime {
        date(2026, 3, 4).and_hms_opt(13, 0, 0).unwrap()
    }

    fn pattern(id: &str, interval: IntervalType, dow: f64) -> HabitPattern {
        HabitPattern {
            habit_id: id.to_string(),
            category: Category::Dining,
            merchant_key: Some("blue bottle".to_string()),
            amount_bucket: None,
            amount_median: 180,
            amount_mad: Some(10),
            interval_type: interval,
            interval_days_median: match interval {
                IntervalType::Weekly => Some(7.0),
                IntervalType::Monthly => Some(30.0),
                _ => Some(1.0),
            },
            dow_prob: [dow; 7],
            time_window_start_min: None,
            time_window_end_min: None,
            active: true,
            updated_at: now(),
        }
    }

    fn coffee(id: &str, d: NaiveDate) -> Transaction {
        Transaction::new(id, 180.0, Category::Dining, d, "Blue Bottle coffee", TxnType::Expense)
    }

    fn weekly_history() -> Vec<Transaction> {
        vec![
            coffee("t1", date(2026, 2, 11)),
            coffee("t2", date(2026, 2, 18)),
            coffee("t3", date(2026, 2, 25)),
        ]
    }

    #[test]
    fn test_weekly_fires_after_full_gap() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];
        let due = find_due_reminder(&patterns, &weekly_history(), &[], now()).unwrap();
        assert_eq!(due.habit_id, "h1");
        assert!((due.score - 0.6).abs() < 1e-9);
        assert_eq!(due.suggested_amount, 180);
        assert_eq!(due.merchant_label.as_deref(), Some("blue bottle"));
        assert!(due.message.contains("this week"));
        assert!(due.message.contains("180"));
    }

    #[test]
    fn test_weekly_match_this_week_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.9)];
        let mut txns = weekly_history();
        // Monday of the current week.
        txns.push(coffee("t4", date(2026, 3, 2)));
        assert_eq!(find_due_reminder(&patterns, &txns, &[], now()), None);
    }

    #[test]
    fn test_weekly_blocks_before_noon() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];
        let morning = date(2026, 3, 4).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(find_due_reminder(&patterns, &weekly_history(), &[], morning), None);
    }

    #[test]
    fn test_weekly_low_dow_prob_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.3)];
        assert_eq!(find_due_reminder(&patterns, &weekly_history(), &[], now()), None);
    }

    #[test]
    fn test_weekly_too_soon_after_last_match_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];
        // Last match Saturday: not in the current week, but only 4 days ago
        // against a required gap of median - 1 = 6.
        let txns = vec![coffee("t1", date(2026, 2, 28))];
        assert_eq!(find_due_reminder(&patterns, &txns, &[], now()), None);
    }

    #[test]
    fn test_monthly_fires_near_expected_day() {
        let patterns = vec![pattern("h1", IntervalType::Monthly, 0.1)];
        let txns = vec![
            coffee("t1", date(2025, 12, 1)),
            coffee("t2", date(2026, 1, 2)),
            coffee("t3", date(2026, 2, 1)),
        ];
        // Expected day-of-month 1, today is the 4th.
        let due = find_due_reminder(&patterns, &txns, &[], now()).unwrap();
        assert_eq!(due.interval_type, IntervalType::Monthly);
        assert!(due.message.contains("this month"));
    }

    #[test]
    fn test_monthly_match_this_month_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Monthly, 0.9)];
        let txns = vec![
            coffee("t1", date(2026, 1, 2)),
            coffee("t2", date(2026, 2, 1)),
            coffee("t3", date(2026, 3, 1)),
        ];
        assert_eq!(find_due_reminder(&patterns, &txns, &[], now()), None);
    }

    #[test]
    fn test_monthly_far_from_expected_day_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Monthly, 0.9)];
        let txns = vec![
            coffee("t1", date(2025, 12, 15)),
            coffee("t2", date(2026, 1, 15)),
            coffee("t3", date(2026, 2, 15)),
        ];
        // Expected day 15; |4 - 15| > 7.
        assert_eq!(find_due_reminder(&patterns, &txns, &[], now()), None);
    }

    #[test]
    fn test_monthly_defaults_to_day_one_below_three_samples() {
        let patterns = vec![pattern("h1", IntervalType::Monthly, 0.1)];
        let txns = vec![coffee("t1", date(2026, 2, 20)), coffee("t2", date(2026, 1, 20))];
        // Two samples: expected day defaults to 1, today the 4th is in range.
        assert!(find_due_reminder(&patterns, &txns, &[], now()).is_some());
    }

    #[test]
    fn test_daily_uses_time_window_with_grace() {
        let mut p = pattern("h1", IntervalType::Daily, 0.7);
        p.time_window_start_min = Some(8 * 60);
        p.time_window_end_min = Some(9 * 60 + 30);
        let patterns = vec![p];

        // 13:00 is past end + 120min grace.
        assert_eq!(find_due_reminder(&patterns, &[], &[], now()), None);

        let in_grace = date(2026, 3, 4).and_hms_opt(11, 0, 0).unwrap();
        assert!(find_due_reminder(&patterns, &[], &[], in_grace).is_some());
    }

    #[test]
    fn test_daily_without_window_waits_for_evening() {
        let patterns = vec![pattern("h1", IntervalType::Daily, 0.7)];
        assert_eq!(find_due_reminder(&patterns, &[], &[], now()), None);

        let evening = date(2026, 3, 4).and_hms_opt(19, 0, 0).unwrap();
        let due = find_due_reminder(&patterns, &[], &[], evening).unwrap();
        assert!((due.score - 0.9).abs() < 1e-9);
        assert!(due.message.contains("today"));
    }

    #[test]
    fn test_daily_low_dow_prob_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Daily, 0.5)];
        let evening = date(2026, 3, 4).and_hms_opt(19, 0, 0).unwrap();
        assert_eq!(find_due_reminder(&patterns, &[], &[], evening), None);
    }

    #[test]
    fn test_already_reminded_today_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];
        let mut state = HabitReminderState::new("h1");
        state.last_reminded_date = Some(date(2026, 3, 4));
        assert_eq!(find_due_reminder(&patterns, &weekly_history(), &[state], now()), None);
    }

    #[test]
    fn test_snooze_blocks_until_expiry() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];

        let mut snoozed = HabitReminderState::new("h1");
        snoozed.snoozed_until = Some(date(2026, 3, 4));
        assert_eq!(
            find_due_reminder(&patterns, &weekly_history(), &[snoozed], now()),
            None
        );

        let mut expired = HabitReminderState::new("h1");
        expired.snoozed_until = Some(date(2026, 3, 3));
        assert!(find_due_reminder(&patterns, &weekly_history(), &[expired], now()).is_some());
    }

    #[test]
    fn test_matching_transaction_today_blocks() {
        let patterns = vec![pattern("h1", IntervalType::Weekly, 0.5)];
        let mut txns = weekly_history();
        txns.push(coffee("t4", date(2026, 3, 4)));
        assert_eq!(find_due_reminder(&patterns, &txns, &[], now()), None);
    }

    #[test]
    fn test_dead_and_inactive_patterns_are_skipped() {
        let mut dead = pattern("dead", IntervalType::Weekly, 0.9);
        dead.merchant_key = None;
        dead.amount_bucket = None;

        let mut inactive = pattern("inactive", IntervalType::Weekly, 0.9);
        inactive.active = false;

        assert_eq!(
            find_due_reminder(&[dead, inactive], &weekly_history(), &[], now()),
            None
        );
    }

    #[test]
    fn test_bucket_matching_when_no_merchant_key() {
        let mut p = pattern("h1", IntervalType::Weekly, 0.5);
        p.merchant_key = None;
        p.amount_bucket = Some(200);
        let txns = vec![
            // Descriptions differ; the 200 bucket is what ties them together.
            Transaction::new("t1", 180.0, Category::Dining, date(2026, 2, 18), "x", TxnType::Expense),
            Transaction::new("t2", 210.0, Category::Dining, date(2026, 2, 25), "y", TxnType::Expense),
        ];
        let due = find_due_reminder(&[p], &txns, &[], now()).unwrap();
        assert_eq!(due.merchant_label, None);
        assert!(due.message.contains("dining"));
    }

    #[test]
    fn test_highest_score_wins_ties_go_first_seen() {
        let low = pattern("low", IntervalType::Weekly, 0.45);
        let high = pattern("high", IntervalType::Weekly, 0.9);
        let due = find_due_reminder(
            &[low.clone(), high.clone()],
            &weekly_history(),
            &[],
            now(),
        )
        .unwrap();
        assert_eq!(due.habit_id, "high");

        let twin = HabitPattern {
            habit_id: "twin".to_string(),
            ..high.clone()
        };
        let due = find_due_reminder(&[high, twin], &weekly_history(), &[], now()).unwrap();
        assert_eq!(due.habit_id, "high");
    }
}
