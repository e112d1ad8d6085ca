//! Grouping keys: merchant signatures from descriptions, coarse amount
//! buckets as the fallback.

use std::sync::LazyLock;

use regex::Regex;

// Unicode classes so CJK descriptions survive normalization intact.
static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}]+").unwrap());

/// Generic filler words that carry no payee signal.
const STOP_WORDS: &[&str] = &[
    "a", "an", "at", "by", "for", "from", "in", "of", "on", "paid", "pay", "payment", "the", "to",
    "via", "with",
];

/// Normalized payee signature: lowercase, `(recurring)` marker stripped,
/// punctuation collapsed to spaces, stop words dropped, first two remaining
/// tokens joined. None when fewer than 3 characters survive.
pub fn merchant_key(description: &str) -> Option<String> {
    let lowered = description.to_lowercase().replace("(recurring)", " ");
    let cleaned = NON_ALNUM.replace_all(&lowered, " ");
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !STOP_WORDS.contains(t))
        .take(2)
        .collect();
    let key = tokens.join(" ");
    if key.chars().count() < 3 {
        None
    } else {
        Some(key)
    }
}

/// Coarse rounding used as the grouping key when no merchant signature is
/// derivable: nearest 100 below 5000, nearest 500 below 20000, else nearest
/// 1000.
pub fn amount_bucket(amount: f64) -> i64 {
    let magnitude = amount.abs();
    let step = if magnitude < 5000.0 {
        100.0
    } else if magnitude < 20000.0 {
        500.0
    } else {
        1000.0
    };
    ((magnitude / step).round() * step) as i64
}
