//! Loan ledger engine for personal debt and receivable tracking
//!
//! Flat-rate installment loans with:
//! - month-end aware due-date scheduling
//! - overdue detection with compounding late fees
//! - payment allocation (late fees, then overdue, then upcoming installments)
//!   and reversal of the last payment
//!
//! Around the loan engine sit the other personal-finance records: an income
//! and expense journal (`budget`) and savings goals (`goals`).
//!
//! All calculations take the reference date as an argument; nothing reads
//! the system clock.

pub mod calendar;
pub mod config;
pub mod error;
pub mod loan;
pub mod engine;
pub mod book;
pub mod budget;
pub mod goals;
pub mod calculator;
pub mod report;
mod persist;

pub use book::{LoanBook, NewLoan, OutstandingTotals};
pub use budget::{Budget, BudgetEntry, BudgetTotals, EntryKind, NewEntry};
pub use goals::{GoalBook, GoalTotals, SavingsGoal};
pub use config::{LedgerConfig, PenaltyPolicy};
pub use error::{LedgerError, LedgerResult};
pub use loan::{Loan, LoanKind, LoanStatus, Payment};
