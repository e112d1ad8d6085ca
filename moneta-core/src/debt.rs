//! Debt record type consumed by the payoff simulator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An outstanding debt, owned by the persistence layer and passed in read-only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    /// Unique identifier
    pub id: String,
    /// Current principal owed
    pub balance: f64,
    /// Annual interest rate, in percent
    pub annual_rate: f64,
    /// Monthly principal commitment
    pub minimum_payment: f64,
    /// Optional calendar due date, used by the due-date strategy
    pub due_date: Option<NaiveDate>,
    /// Settled debts never enter simulation
    pub is_paid: bool,
}

impl Debt {
    /// Create a new unpaid debt with no due date
    pub fn new(id: impl Into<String>, balance: f64, annual_rate: f64, minimum_payment: f64) -> Self {
        Self {
            id: id.into(),
            balance,
            annual_rate,
            minimum_payment,
            due_date: None,
            is_paid: false,
        }
    }

    /// Attach a due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Only unpaid debts with a positive balance are simulated
    pub fn is_payable(&self) -> bool {
        !self.is_paid && self.balance > 0.0
    }
}
