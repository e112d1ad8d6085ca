//! Habit pattern and reminder-state types

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::transaction::Category;

/// Cadence classification for a detected habit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IntervalType {
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "unknown")]
    Unknown,
}

impl IntervalType {
    /// Cadence hint word used in reminder copy
    pub fn hint(&self) -> &'static str {
        match self {
            IntervalType::Daily | IntervalType::Unknown => "today",
            IntervalType::Weekly => "this week",
            IntervalType::Monthly => "this month",
        }
    }

    /// Score bonus when ranking competing reminders
    pub fn score_bonus(&self) -> f64 {
        match self {
            IntervalType::Daily => 0.2,
            IntervalType::Weekly => 0.1,
            IntervalType::Monthly | IntervalType::Unknown => 0.0,
        }
    }
}

/// A recurring-spend habit distilled from transaction history.
///
/// Exactly one of `merchant_key` / `amount_bucket` is set on every pattern the
/// detector emits; the merchant key wins whenever the description yields one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitPattern {
    /// Stable hash of category + merchant-key-or-amount-bucket
    pub habit_id: String,
    pub category: Category,
    /// Normalized text signature of the payee, when derivable
    pub merchant_key: Option<String>,
    /// Coarse amount rounding used as the grouping key otherwise
    pub amount_bucket: Option<i64>,
    /// Median transaction amount, rounded
    pub amount_median: i64,
    /// Median absolute deviation of amounts; None below 3 samples
    pub amount_mad: Option<i64>,
    pub interval_type: IntervalType,
    /// Median whole-day gap between consecutive occurrences
    pub interval_days_median: Option<f64>,
    /// Empirical firing probability per weekday, index 0 = Sunday
    pub dow_prob: [f64; 7],
    /// Minute-of-day window bounds, when enough timestamped samples exist
    pub time_window_start_min: Option<u32>,
    pub time_window_end_min: Option<u32>,
    pub active: bool,
    pub updated_at: NaiveDateTime,
}

impl HabitPattern {
    /// True when the pattern carries a usable matching criterion
    pub fn has_match_key(&self) -> bool {
        self.merchant_key.is_some() || self.amount_bucket.is_some()
    }
}

/// Anti-spam state for one habit's reminders.
///
/// Created and updated by the UI layer on dismiss/snooze; the matcher only
/// reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HabitReminderState {
    pub habit_id: String,
    pub last_reminded_date: Option<NaiveDate>,
    pub snoozed_until: Option<NaiveDate>,
    pub dismiss_count_recent: u32,
}

impl HabitReminderState {
    /// Fresh state for a habit that has never been reminded
    pub fn new(habit_id: impl Into<String>) -> Self {
        Self {
            habit_id: habit_id.into(),
            last_reminded_date: None,
            snoozed_until: None,
            dismiss_count_recent: 0,
        }
    }
}
