//! Due-date scheduling and due-status classification

use crate::calendar::{add_months_clamped, days_between};
use crate::config::DEFAULT_DUE_SOON_DAYS;
use crate::loan::Loan;
use chrono::NaiveDate;
use std::fmt;

/// Due date of the 1-based installment `index`: `index` calendar months after
/// the start date, clamped to the end of short months.
///
/// Index 0 has no due date.
pub fn due_date_of_installment(start_date: NaiveDate, index: u32) -> Option<NaiveDate> {
    if index == 0 {
        return None;
    }
    add_months_clamped(start_date, index)
}

/// Due date of the first installment not yet covered by a payment.
///
/// `None` when every installment is covered or the loan has no usable start date.
pub fn next_due_date(loan: &Loan) -> Option<NaiveDate> {
    let paid = loan.paid_installments();
    if paid >= loan.installment_count {
        return None;
    }
    due_date_of_installment(loan.start_date?, paid + 1)
}

/// Where a due date stands relative to "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Nothing left to pay, or no schedulable due date
    NoDue,
    /// Due date passed `days` days ago
    Overdue { days: i64 },
    DueToday,
    /// Due within the due-soon window
    DueSoon { days: i64 },
    /// Due further out than the due-soon window
    Active { days: i64 },
}

impl DueStatus {
    /// Classify with an explicit due-soon window (in days)
    pub fn classify(due: Option<NaiveDate>, today: NaiveDate, soon_window_days: i64) -> Self {
        let Some(due) = due else {
            return DueStatus::NoDue;
        };
        let days = days_between(today, due);
        if days < 0 {
            DueStatus::Overdue { days: -days }
        } else if days == 0 {
            DueStatus::DueToday
        } else if days <= soon_window_days {
            DueStatus::DueSoon { days }
        } else {
            DueStatus::Active { days }
        }
    }

    pub fn is_overdue(&self) -> bool {
        matches!(self, DueStatus::Overdue { .. })
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueStatus::NoDue => write!(f, "no-due"),
            DueStatus::Overdue { days } => write!(f, "overdue {days}d"),
            DueStatus::DueToday => write!(f, "due-today"),
            DueStatus::DueSoon { days } => write!(f, "due-soon {days}d"),
            DueStatus::Active { days } => write!(f, "active {days}d"),
        }
    }
}

/// Classify a due date using the default 7-day due-soon window
pub fn due_status(due: Option<NaiveDate>, today: NaiveDate) -> DueStatus {
    DueStatus::classify(due, today, DEFAULT_DUE_SOON_DAYS)
}

/// Due status of a loan's next unpaid installment
pub fn loan_due_status(loan: &Loan, today: NaiveDate, soon_window_days: i64) -> DueStatus {
    if loan.is_settled() {
        return DueStatus::NoDue;
    }
    DueStatus::classify(next_due_date(loan), today, soon_window_days)
}
