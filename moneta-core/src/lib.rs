//! moneta-core: shared domain types and utilities for the Moneta engines

pub mod calendar;
pub mod debt;
pub mod habit;
pub mod hash;
pub mod stats;
pub mod transaction;

pub use calendar::{add_months, days_between, minute_of_day, month_start, week_start, weekday_index};
pub use debt::Debt;
pub use habit::{HabitPattern, HabitReminderState, IntervalType};
pub use hash::habit_id;
pub use stats::{median, median_abs_deviation, percentile};
pub use transaction::{Category, Transaction, TxnType};
