//! Debt payoff simulation.
//!
//! One call = one deterministic month-by-month amortization over a working
//! copy of the caller's debts. Interest is charged as a cost but never
//! capitalized into principal; minimum payments are honored in input order
//! before any leftover budget is rolled onto debts in strategy order.

use std::collections::HashMap;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use moneta_core::{add_months, Debt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::strategy::{order_debts, PayoffStrategy};

/// Balances at or below this are treated as paid; rounding residue must not
/// keep the loop alive.
const PAID_THRESHOLD: f64 = 0.5;

/// Default cap on simulated months (50 years).
pub const DEFAULT_MAX_MONTHS: u32 = 600;

/// Why a simulation could not produce a payoff date
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SimulationWarning {
    /// Monthly principal budget computed to zero; nothing was simulated
    #[serde(rename = "budget-not-configured")]
    BudgetNotConfigured,
    /// The month cap was reached with balances still outstanding
    #[serde(rename = "plan-too-long")]
    PlanTooLong,
}

impl SimulationWarning {
    /// User-facing reason string
    pub fn message(&self) -> &'static str {
        match self {
            SimulationWarning::BudgetNotConfigured => "set monthly payments to project payoff",
            SimulationWarning::PlanTooLong => "payment plan too long; increase payments",
        }
    }
}

/// Simulation inputs beyond the debt list
#[derive(Debug, Clone, Copy)]
pub struct SimulateOptions {
    pub strategy: PayoffStrategy,
    /// Budget on top of the summed minimum payments; must be >= 0
    pub extra_principal_budget: f64,
    pub start_date: NaiveDate,
    /// Hard cap on simulated months; must be > 0
    pub max_months: u32,
    /// Effective minimum for debts whose own `minimum_payment` is zero
    pub min_payment_fallback: Option<fn(&Debt) -> f64>,
}

impl SimulateOptions {
    pub fn new(strategy: PayoffStrategy, start_date: NaiveDate) -> Self {
        Self {
            strategy,
            extra_principal_budget: 0.0,
            start_date,
            max_months: DEFAULT_MAX_MONTHS,
            min_payment_fallback: None,
        }
    }

    pub fn with_extra_budget(mut self, extra: f64) -> Self {
        self.extra_principal_budget = extra;
        self
    }

    pub fn with_max_months(mut self, max_months: u32) -> Self {
        self.max_months = max_months;
        self
    }

    pub fn with_min_payment_fallback(mut self, fallback: fn(&Debt) -> f64) -> Self {
        self.min_payment_fallback = Some(fallback);
        self
    }
}

/// Per-debt payoff detail, written once the month its balance crosses paid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtPayoff {
    pub payoff_month: u32,
    pub payoff_date: NaiveDate,
    pub total_interest_paid: f64,
}

/// Outcome of a simulation; plain serializable data for the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResult {
    pub warning: Option<SimulationWarning>,
    pub months: Option<u32>,
    pub payoff_date: Option<NaiveDate>,
    pub monthly_principal_budget: f64,
    pub total_interest_paid: f64,
    pub per_debt: HashMap<String, DebtPayoff>,
}

impl SimulationResult {
    fn empty(start_date: NaiveDate) -> Self {
        Self {
            warning: None,
            months: Some(0),
            payoff_date: Some(start_date),
            monthly_principal_budget: 0.0,
            total_interest_paid: 0.0,
            per_debt: HashMap::new(),
        }
    }
}

/// Simulate month-by-month amortization of `debts` under `options`.
///
/// Business-level failures (no budget configured, plan exceeds the month cap)
/// come back as a `warning` on the result; `Err` is reserved for contract
/// violations in the invocation itself.
pub fn simulate(debts: &[Debt], options: &SimulateOptions) -> Result<SimulationResult> {
    if options.extra_principal_budget < 0.0 {
        bail!(
            "extra_principal_budget must be >= 0, got {}",
            options.extra_principal_budget
        );
    }
    if options.max_months == 0 {
        bail!("max_months must be > 0");
    }

    // Working copy; the caller's debts are never touched.
    let mut working: Vec<Debt> = debts.iter().filter(|d| d.is_payable()).cloned().collect();
    if working.is_empty() {
        return Ok(SimulationResult::empty(options.start_date));
    }

    let minimums: Vec<f64> = working
        .iter()
        .map(|d| {
            if d.minimum_payment > 0.0 {
                d.minimum_payment
            } else {
                options.min_payment_fallback.map(|f| f(d)).unwrap_or(0.0)
            }
        })
        .collect();

    let budget: f64 = minimums.iter().sum::<f64>() + options.extra_principal_budget;
    if budget <= 0.0 {
        return Ok(SimulationResult {
            warning: Some(SimulationWarning::BudgetNotConfigured),
            months: None,
            payoff_date: None,
            monthly_principal_budget: budget,
            total_interest_paid: 0.0,
            per_debt: HashMap::new(),
        });
    }

    let mut total_interest = 0.0;
    let mut interest_accrued = vec![0.0; working.len()];
    let mut per_debt: HashMap<String, DebtPayoff> = HashMap::new();
    let mut months_elapsed: Option<u32> = None;

    for month in 1..=options.max_months {
        // 1. Interest on active balances: accumulated as a cost, paid
        //    out-of-band, never added to principal.
        for (i, d) in working.iter().enumerate() {
            if d.balance > PAID_THRESHOLD {
                let interest = (d.balance * d.annual_rate / 100.0 / 12.0).round();
                total_interest += interest;
                interest_accrued[i] += interest;
            }
        }

        // 2. Minimums in input order, regardless of strategy.
        let mut remaining = budget;
        for (i, d) in working.iter_mut().enumerate() {
            if d.balance <= PAID_THRESHOLD {
                continue;
            }
            let pay = minimums[i].min(remaining).min(d.balance);
            if pay > 0.0 {
                d.balance -= pay;
                remaining -= pay;
            }
        }

        // 3. Leftover rolls onto debts in strategy order, one at a time.
        //    Snowball re-ranks on current balances each month.
        if remaining > 0.0 {
            for i in order_debts(&working, options.strategy) {
                if remaining <= 0.0 {
                    break;
                }
                if working[i].balance <= PAID_THRESHOLD {
                    continue;
                }
                let pay = remaining.min(working[i].balance);
                working[i].balance -= pay;
                remaining -= pay;
            }
        }

        // 4. First month a balance crosses paid, pin its payoff detail.
        for (i, d) in working.iter().enumerate() {
            if d.balance <= PAID_THRESHOLD && !per_debt.contains_key(&d.id) {
                debug!(debt = %d.id, month, "debt paid off");
                per_debt.insert(
                    d.id.clone(),
                    DebtPayoff {
                        payoff_month: month,
                        payoff_date: add_months(options.start_date, month),
                        total_interest_paid: interest_accrued[i],
                    },
                );
            }
        }

        if working.iter().all(|d| d.balance <= PAID_THRESHOLD) {
            months_elapsed = Some(month);
            break;
        }
    }

    let result = match months_elapsed {
        Some(months) => SimulationResult {
            warning: None,
            months: Some(months),
            payoff_date: Some(add_months(options.start_date, months)),
            monthly_principal_budget: budget,
            total_interest_paid: total_interest,
            per_debt,
        },
        // Partial totals stay useful to the caller even when the plan
        // cannot amortize within the cap.
        None => SimulationResult {
            warning: Some(SimulationWarning::PlanTooLong),
            months: None,
            payoff_date: None,
            monthly_principal_budget: budget,
            total_interest_paid: total_interest,
            per_debt,
        },
    };

    info!(
        debts = working.len(),
        months = ?result.months,
        total_interest = result.total_interest_paid,
        "simulation finished"
    );
    Ok(result)
}
