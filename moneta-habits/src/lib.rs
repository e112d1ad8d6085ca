//! moneta-habits: recurring-spend pattern detection and reminder matching.

pub mod detect;
pub mod matcher;
pub mod merchant;

pub use detect::detect_patterns;
pub use matcher::{find_due_reminder, ReminderCandidate};
pub use merchant::{amount_bucket, merchant_key};
