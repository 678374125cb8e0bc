//! Loan book: owned loan collection and its JSON store

mod ledger;
mod store;

pub use ledger::{LoanBook, NewLoan, OutstandingTotals};
