//! Loan data structures

mod data;

pub use data::{Loan, LoanKind, LoanStatus, Payment};
