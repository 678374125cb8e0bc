//! Loan ledger engine: pure calculations over a single loan
//!
//! - `amortization`: flat-rate totals and installment amount
//! - `schedule`: due dates and due-status classification
//! - `overdue`: overdue installments and compounding late fees
//! - `allocator`: applying and reversing payments

mod amortization;
mod schedule;
mod overdue;
mod allocator;

pub use amortization::{compute_amortization, Amortization};
pub use schedule::{due_date_of_installment, due_status, loan_due_status, next_due_date, DueStatus};
pub use overdue::{compound_penalty, compute_overdue_and_penalty, OverdueSnapshot, PenaltyPeriod};
pub use allocator::{allocate_payment, plan_allocation, reverse_last_payment, PaymentAllocation};
