//! Transaction record types shared by both engines

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of a transaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxnType {
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

/// Spending categories matched deterministically by the surrounding app
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "groceries")]
    Groceries,
    #[serde(rename = "dining")]
    Dining,
    #[serde(rename = "transport")]
    Transport,
    #[serde(rename = "utilities")]
    Utilities,
    #[serde(rename = "entertainment")]
    Entertainment,
    #[serde(rename = "shopping")]
    Shopping,
    #[serde(rename = "health")]
    Health,
    #[serde(rename = "subscriptions")]
    Subscriptions,
    #[serde(rename = "debt-payment")]
    DebtPayment,
    #[serde(rename = "savings")]
    Savings,
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "other")]
    Other,
}

impl Category {
    /// Transfers move money between the user's own buckets; they are not
    /// organic spending and never form habits.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Category::DebtPayment | Category::Savings)
    }

    /// Stable tag used when hashing habit ids (the serde rename string).
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Dining => "dining",
            Category::Transport => "transport",
            Category::Utilities => "utilities",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Health => "health",
            Category::Subscriptions => "subscriptions",
            Category::DebtPayment => "debt-payment",
            Category::Savings => "savings",
            Category::Income => "income",
            Category::Other => "other",
        }
    }
}

/// A single logged transaction, passed into the core as a read-only snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Unique identifier for this record
    pub id: String,
    /// Positive magnitude; direction lives in `txn_type`
    pub amount: f64,
    /// Deterministic category
    pub category: Category,
    /// Date of the transaction
    pub date: NaiveDate,
    /// Human-readable description
    pub description: String,
    /// Expense or income
    pub txn_type: TxnType,
    /// Finer-grained creation timestamp, used only for time-of-day inference
    pub created_at: Option<NaiveDateTime>,
}

impl Transaction {
    /// Create a new transaction with no creation timestamp
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        category: Category,
        date: NaiveDate,
        description: impl Into<String>,
        txn_type: TxnType,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            category,
            date,
            description: description.into(),
            txn_type,
            created_at: None,
        }
    }

    /// Attach a creation timestamp
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns true if this is an expense
    pub fn is_expense(&self) -> bool {
        self.txn_type == TxnType::Expense
    }
}
