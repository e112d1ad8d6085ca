//! Habit pattern detection over transaction history.
//!
//! Groups recurring expenses by merchant signature (or amount bucket), then
//! distills robust statistics per group: median/MAD of amounts, gap cadence,
//! day-of-week firing probability and a time-of-day window.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use moneta_core::{
    habit_id, median, median_abs_deviation, minute_of_day, percentile, weekday_index, Category,
    HabitPattern, IntervalType, Transaction,
};
use tracing::{debug, info};

use crate::merchant::{amount_bucket, merchant_key};

/// Only transactions in this trailing window are considered at all.
const CANDIDATE_WINDOW_DAYS: i64 = 180;
/// Day-of-week and time-of-day statistics use this tighter trailing window.
const RECENT_WINDOW_DAYS: i64 = 56;
/// Groups below this size never become patterns.
const MIN_GROUP_SIZE: usize = 3;
/// Timestamped samples needed before a time-of-day window is inferred.
const MIN_TIME_SAMPLES: usize = 5;
/// Windows narrower than this are re-centered on the median +/- half of it.
const MIN_WINDOW_MINUTES: f64 = 90.0;

type GroupKey = (Category, Option<String>, Option<i64>);

/// Detect recurring-spend patterns in `transactions` as of `now`.
///
/// Output order is the first-seen order of each group's earliest candidate,
/// so downstream tie-breaks stay deterministic. Bad records (non-positive
/// amounts) are skipped, not raised.
pub fn detect_patterns(transactions: &[Transaction], now: NaiveDateTime) -> Vec<HabitPattern> {
    let today = now.date();
    let window_start = today - Duration::days(CANDIDATE_WINDOW_DAYS);

    // Group candidates in first-seen order.
    let mut order: Vec<GroupKey> = Vec::new();
    let mut groups: HashMap<GroupKey, Vec<&Transaction>> = HashMap::new();
    for txn in transactions {
        if !txn.is_expense() || txn.category.is_transfer() || txn.amount <= 0.0 {
            continue;
        }
        if txn.date < window_start || txn.date > today {
            continue;
        }
        let key = grouping_key(txn);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(txn);
    }

    let mut patterns = Vec::new();
    for key in order {
        let group = &groups[&key];
        if group.len() < MIN_GROUP_SIZE {
            debug!(?key, size = group.len(), "group below sample threshold");
            continue;
        }
        patterns.push(build_pattern(group, today, now));
    }

    info!(
        candidates = transactions.len(),
        patterns = patterns.len(),
        "habit detection finished"
    );
    patterns
}

fn grouping_key(txn: &Transaction) -> GroupKey {
    match merchant_key(&txn.description) {
        Some(mk) => (txn.category, Some(mk), None),
        None => (txn.category, None, Some(amount_bucket(txn.amount))),
    }
}

fn build_pattern(group: &[&Transaction], today: NaiveDate, now: NaiveDateTime) -> HabitPattern {
    let amounts: Vec<f64> = group.iter().map(|t| t.amount).collect();
    let amount_median = median(&amounts).unwrap_or(0.0).round() as i64;
    let amount_mad = median_abs_deviation(&amounts).map(|m| m.round() as i64);

    let mut dates: Vec<NaiveDate> = group.iter().map(|t| t.date).collect();
    dates.sort();
    let gaps: Vec<f64> = dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days() as f64)
        .filter(|g| *g > 0.0)
        .collect();
    let interval_days_median = median(&gaps);
    let interval_type = classify_interval(interval_days_median);

    let recent_start = today - Duration::days(RECENT_WINDOW_DAYS);
    let dow_prob = dow_probability(&dates, recent_start, today);
    let (time_window_start_min, time_window_end_min) = time_window(group, recent_start);

    // Representative fields come from the most recent transaction, re-derived
    // rather than cached so description drift tracks the latest spelling.
    let newest: &Transaction = group
        .iter()
        .max_by_key(|t| t.date)
        .expect("group is non-empty");
    let (category, mk, bucket) = grouping_key(newest);

    HabitPattern {
        habit_id: habit_id(category, mk.as_deref(), bucket),
        category,
        merchant_key: mk,
        amount_bucket: bucket,
        amount_median,
        amount_mad,
        interval_type,
        interval_days_median,
        dow_prob,
        time_window_start_min,
        time_window_end_min,
        active: true,
        updated_at: now,
    }
}

fn classify_interval(median_gap: Option<f64>) -> IntervalType {
    match median_gap {
        None => IntervalType::Unknown,
        Some(m) if m <= 2.0 => IntervalType::Daily,
        Some(m) if (m - 7.0).abs() <= 1.0 => IntervalType::Weekly,
        Some(m) if (m - 30.0).abs() <= 5.0 => IntervalType::Monthly,
        Some(_) => IntervalType::Unknown,
    }
}

/// Empirical firing probability per weekday over the recent window: counts
/// divided by observed weeks, clamped. Not a distribution; unobserved days
/// are legitimately zero.
fn dow_probability(dates: &[NaiveDate], recent_start: NaiveDate, today: NaiveDate) -> [f64; 7] {
    let mut counts = [0u32; 7];
    for date in dates {
        if *date >= recent_start {
            counts[weekday_index(*date)] += 1;
        }
    }
    let days = (today - recent_start).num_days() as f64;
    let weeks = (days / 7.0).ceil().max(1.0);
    let mut prob = [0.0; 7];
    for (i, count) in counts.iter().enumerate() {
        prob[i] = (*count as f64 / weeks).clamp(0.0, 1.0);
    }
    prob
}

/// 25th/75th-percentile minute-of-day window from recent timestamped entries;
/// re-centered on the median when narrower than 90 minutes.
fn time_window(group: &[&Transaction], recent_start: NaiveDate) -> (Option<u32>, Option<u32>) {
    let minutes: Vec<f64> = group
        .iter()
        .filter(|t| t.date >= recent_start)
        .filter_map(|t| t.created_at)
        .map(|ts| minute_of_day(ts) as f64)
        .collect();
    if minutes.len() < MIN_TIME_SAMPLES {
        return (None, None);
    }

    let mut start = percentile(&minutes, 0.25).expect("non-empty sample");
    let mut end = percentile(&minutes, 0.75).expect("non-empty sample");
    if end - start < MIN_WINDOW_MINUTES {
        let center = median(&minutes).expect("non-empty sample");
        start = center - MIN_WINDOW_MINUTES / 2.0;
        end = center + MIN_WINDOW_MINUTES / 2.0;
    }
    (
        Some(start.clamp(0.0, 1440.0).round() as u32),
        Some(end.clamp(0.0, 1440.0).round() as u32),
    )
}
