//! moneta-payoff: month-by-month debt amortization under a chosen
//! prioritization strategy.

pub mod simulate;
pub mod strategy;

pub use simulate::{simulate, DebtPayoff, SimulateOptions, SimulationResult, SimulationWarning};
pub use strategy::{order_debts, PayoffStrategy};
