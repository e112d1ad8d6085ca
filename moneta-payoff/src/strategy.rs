//! Extra-payment prioritization strategies.

use moneta_core::Debt;
use serde::{Deserialize, Serialize};

/// How leftover budget is prioritized across debts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PayoffStrategy {
    /// Highest annual rate first
    #[serde(rename = "avalanche")]
    Avalanche,
    /// Smallest balance first
    #[serde(rename = "snowball")]
    Snowball,
    /// Earliest due date first; undated debts last
    #[serde(rename = "due-date")]
    DueDate,
}

/// Return the indices of `debts` in strategy order.
///
/// Sorting is stable, so avalanche/snowball ties keep input order; due-date
/// ties break by id so reordering the input list cannot change the plan.
pub fn order_debts(debts: &[Debt], strategy: PayoffStrategy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    match strategy {
        PayoffStrategy::Avalanche => {
            order.sort_by(|&a, &b| {
                debts[b]
                    .annual_rate
                    .partial_cmp(&debts[a].annual_rate)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        PayoffStrategy::Snowball => {
            order.sort_by(|&a, &b| {
                debts[a]
                    .balance
                    .partial_cmp(&debts[b].balance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        PayoffStrategy::DueDate => {
            order.sort_by(|&a, &b| {
                let da = &debts[a];
                let db = &debts[b];
                match (da.due_date, db.due_date) {
                    (Some(x), Some(y)) => x.cmp(&y).then_with(|| da.id.cmp(&db.id)),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => da.id.cmp(&db.id),
                }
            });
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_avalanche_highest_rate_first() {
        let debts = vec![
            Debt::new("low", 1000.0, 5.0, 100.0),
            Debt::new("high", 2000.0, 24.0, 100.0),
            Debt::new("mid", 3000.0, 12.0, 100.0),
        ];
        let order = order_debts(&debts, PayoffStrategy::Avalanche);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_snowball_smallest_balance_first() {
        let debts = vec![
            Debt::new("big", 9000.0, 5.0, 100.0),
            Debt::new("small", 500.0, 24.0, 100.0),
            Debt::new("mid", 3000.0, 12.0, 100.0),
        ];
        let order = order_debts(&debts, PayoffStrategy::Snowball);
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_due_date_undated_sort_last_ties_by_id() {
        let debts = vec![
            Debt::new("c", 1000.0, 5.0, 100.0),
            Debt::new("b", 1000.0, 5.0, 100.0).with_due_date(date(2026, 4, 15)),
            Debt::new("a", 1000.0, 5.0, 100.0).with_due_date(date(2026, 4, 15)),
            Debt::new("d", 1000.0, 5.0, 100.0).with_due_date(date(2026, 4, 1)),
        ];
        let order = order_debts(&debts, PayoffStrategy::DueDate);
        // earliest dated first, then 4/15 ties by id (a before b), undated last
        assert_eq!(order, vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_avalanche_ties_keep_input_order() {
        let debts = vec![
            Debt::new("first", 1000.0, 10.0, 100.0),
            Debt::new("second", 2000.0, 10.0, 100.0),
        ];
        let order = order_debts(&debts, PayoffStrategy::Avalanche);
        assert_eq!(order, vec![0, 1]);
    }
}
