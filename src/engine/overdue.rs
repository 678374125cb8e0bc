//! Overdue installment detection and compounding late fees
//!
//! Late fees accrue per elapsed penalty period (30 days by default) counted
//! from the due date of the oldest unpaid installment. Each period charges the
//! penalty rate on the fee-inclusive balance of the previous period:
//!
//! ```text
//! basis_1 = overdue_installment_amount
//! fee_k   = round(basis_k × rate)
//! basis_k+1 = basis_k + fee_k
//! ```
//!
//! Amounts saturate at `i64::MAX` rather than overflow when a large balance
//! compounds for many periods.

use crate::calendar::days_between;
use crate::config::PenaltyPolicy;
use crate::engine::schedule::due_date_of_installment;
use crate::loan::Loan;
use chrono::NaiveDate;
use serde::Serialize;

/// Late fee charged for one penalty period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenaltyPeriod {
    /// 1-based period number
    pub index: u32,
    pub penalty: i64,
    /// Balance the fee was charged on (overdue amount plus earlier fees)
    pub basis_before_penalty: i64,
}

/// Overdue position of a loan as of a reference date
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OverdueSnapshot {
    pub overdue_installment_amount: i64,
    pub overdue_installment_count: u32,
    /// Due date of the oldest unpaid installment, when it is overdue
    pub first_overdue_due_date: Option<NaiveDate>,
    pub days_late: i64,
    pub periods_late: u32,
    pub penalty_amount: i64,
    pub penalty_breakdown: Vec<PenaltyPeriod>,
    /// Total amount still owed on installments (late fees excluded)
    pub remaining_principal_balance: i64,
}

impl OverdueSnapshot {
    /// Late fees plus overdue installments
    pub fn total_due_now(&self) -> i64 {
        self.overdue_installment_amount.saturating_add(self.penalty_amount)
    }
}

/// Compound `periods` late-fee periods on `overdue_amount`
pub fn compound_penalty(overdue_amount: i64, periods: u32, rate_per_period: f64) -> Vec<PenaltyPeriod> {
    let mut basis = overdue_amount;
    let mut breakdown = Vec::with_capacity(periods as usize);
    for index in 1..=periods {
        let penalty = (basis as f64 * rate_per_period).round() as i64;
        breakdown.push(PenaltyPeriod {
            index,
            penalty,
            basis_before_penalty: basis,
        });
        basis = basis.saturating_add(penalty);
    }
    breakdown
}

/// Compute overdue installments and accrued late fees as of `as_of`.
///
/// Pure and idempotent for a fixed date; recompute it whenever the loan is
/// displayed or a payment is about to be allocated.
pub fn compute_overdue_and_penalty(loan: &Loan, as_of: NaiveDate, policy: &PenaltyPolicy) -> OverdueSnapshot {
    let installment = loan.amortization().installment_amount();
    let paid = loan.paid_installments();

    let mut snapshot = OverdueSnapshot {
        remaining_principal_balance: loan.remaining_balance(),
        ..Default::default()
    };

    let Some(start) = loan.start_date else {
        return snapshot;
    };

    // Walk unpaid installments until the first one that is still in the future
    for index in paid.saturating_add(1)..=loan.installment_count {
        let Some(due) = due_date_of_installment(start, index) else {
            break;
        };
        if due > as_of {
            break;
        }
        if snapshot.first_overdue_due_date.is_none() {
            snapshot.first_overdue_due_date = Some(due);
        }
        snapshot.overdue_installment_amount = snapshot.overdue_installment_amount.saturating_add(installment);
        snapshot.overdue_installment_count += 1;
    }

    let Some(first_due) = snapshot.first_overdue_due_date else {
        return snapshot;
    };

    snapshot.days_late = days_between(first_due, as_of);
    if policy.period_days > 0 {
        snapshot.periods_late = (snapshot.days_late / policy.period_days) as u32;
    }

    if snapshot.periods_late > 0 {
        snapshot.penalty_breakdown = compound_penalty(
            snapshot.overdue_installment_amount,
            snapshot.periods_late,
            policy.rate_per_period,
        );
        snapshot.penalty_amount = snapshot
            .penalty_breakdown
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.penalty));
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanKind, LoanStatus, Payment};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 1.2M over 12 months, no interest: 100,000 per installment
    fn monthly_loan() -> Loan {
        Loan {
            id: 3,
            kind: LoanKind::Receivable,
            counterparty: "Andi".to_string(),
            principal: 1_200_000,
            start_date: Some(date(2024, 1, 1)),
            interest_rate_percent: 0.0,
            installment_count: 12,
            status: LoanStatus::Active,
            completion_date: None,
            payment_history: Vec::new(),
        }
    }

    #[test]
    fn test_counts_overdue_installments() {
        let loan = monthly_loan();
        let snap = compute_overdue_and_penalty(&loan, date(2024, 4, 15), &PenaltyPolicy::default());

        // Feb 1, Mar 1 and Apr 1 are all on or before Apr 15
        assert_eq!(snap.overdue_installment_count, 3);
        assert_eq!(snap.overdue_installment_amount, 300_000);
        assert_eq!(snap.first_overdue_due_date, Some(date(2024, 2, 1)));
        assert_eq!(snap.remaining_principal_balance, 1_200_000);
    }

    #[test]
    fn test_due_date_itself_counts_as_overdue() {
        let loan = monthly_loan();
        let snap = compute_overdue_and_penalty(&loan, date(2024, 2, 1), &PenaltyPolicy::default());
        assert_eq!(snap.overdue_installment_count, 1);
        assert_eq!(snap.days_late, 0);
        assert_eq!(snap.penalty_amount, 0);

        let before = compute_overdue_and_penalty(&loan, date(2024, 1, 31), &PenaltyPolicy::default());
        assert_eq!(before.overdue_installment_count, 0);
        assert_eq!(before.first_overdue_due_date, None);
    }

    #[test]
    fn test_compound_penalty_breakdown() {
        let breakdown = compound_penalty(300_000, 2, 0.05);
        assert_eq!(
            breakdown,
            vec![
                PenaltyPeriod { index: 1, penalty: 15_000, basis_before_penalty: 300_000 },
                PenaltyPeriod { index: 2, penalty: 15_750, basis_before_penalty: 315_000 },
            ]
        );
        let total: i64 = breakdown.iter().map(|p| p.penalty).sum();
        assert_eq!(total, 30_750);
    }

    #[test]
    fn test_penalty_periods_use_thirty_day_blocks() {
        let loan = monthly_loan();
        // 74 days after Feb 1 -> 2 full periods
        let snap = compute_overdue_and_penalty(&loan, date(2024, 4, 15), &PenaltyPolicy::default());
        assert_eq!(snap.days_late, 74);
        assert_eq!(snap.periods_late, 2);
        assert_eq!(snap.penalty_amount, 30_750);
        assert_eq!(snap.penalty_breakdown.len(), 2);
        assert_eq!(snap.total_due_now(), 330_750);

        // 29 days late -> no period has elapsed yet
        let early = compute_overdue_and_penalty(&loan, date(2024, 3, 1), &PenaltyPolicy::default());
        assert_eq!(early.days_late, 29);
        assert_eq!(early.periods_late, 0);
        assert_eq!(early.overdue_installment_count, 2);
        assert_eq!(early.penalty_amount, 0);
        assert!(early.penalty_breakdown.is_empty());
    }

    #[test]
    fn test_custom_policy() {
        let loan = monthly_loan();
        let policy = PenaltyPolicy { rate_per_period: 0.10, period_days: 7 };
        let snap = compute_overdue_and_penalty(&loan, date(2024, 2, 15), &policy);
        // One installment, 14 days late -> 2 weekly periods at 10%
        assert_eq!(snap.periods_late, 2);
        assert_eq!(snap.penalty_amount, 10_000 + 11_000);
    }

    #[test]
    fn test_payments_shift_first_unpaid_installment() {
        let mut loan = monthly_loan();
        loan.payment_history.push(Payment {
            date: date(2024, 2, 1),
            principal_portion: 200_000,
            penalty_portion: 0,
            installments_covered: 2,
        });
        let snap = compute_overdue_and_penalty(&loan, date(2024, 4, 15), &PenaltyPolicy::default());
        assert_eq!(snap.overdue_installment_count, 1);
        assert_eq!(snap.first_overdue_due_date, Some(date(2024, 4, 1)));
        assert_eq!(snap.periods_late, 0);
        assert_eq!(snap.remaining_principal_balance, 1_000_000);
    }

    #[test]
    fn test_overdue_walk_stops_at_last_installment() {
        let mut loan = monthly_loan();
        loan.installment_count = 2;
        let snap = compute_overdue_and_penalty(&loan, date(2025, 1, 1), &PenaltyPolicy::default());
        assert_eq!(snap.overdue_installment_count, 2);
        assert_eq!(snap.overdue_installment_amount, 1_200_000);
    }

    #[test]
    fn test_missing_start_date_has_no_overdue() {
        let mut loan = monthly_loan();
        loan.start_date = None;
        let snap = compute_overdue_and_penalty(&loan, date(2024, 12, 31), &PenaltyPolicy::default());
        assert_eq!(snap.overdue_installment_count, 0);
        assert_eq!(snap.penalty_amount, 0);
        assert_eq!(snap.remaining_principal_balance, 1_200_000);
    }

    #[test]
    fn test_long_overdue_penalty_saturates() {
        // 1B principal, 48 installments, rate 100% per period: the basis
        // doubles every 30 days for four years
        let loan = Loan {
            principal: 1_000_000_000,
            start_date: Some(date(2020, 1, 1)),
            installment_count: 48,
            ..monthly_loan()
        };
        let policy = PenaltyPolicy { rate_per_period: 1.0, period_days: 30 };
        let snap = compute_overdue_and_penalty(&loan, date(2024, 1, 1), &policy);

        assert_eq!(snap.overdue_installment_count, 48);
        assert!(snap.periods_late > 40);
        assert_eq!(snap.penalty_amount, i64::MAX);
        assert_eq!(snap.total_due_now(), i64::MAX);
        assert!(snap.penalty_breakdown.iter().all(|p| p.penalty >= 0));
        assert!(snap
            .penalty_breakdown
            .windows(2)
            .all(|w| w[1].basis_before_penalty >= w[0].basis_before_penalty));
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let loan = monthly_loan();
        let policy = PenaltyPolicy::default();
        let a = compute_overdue_and_penalty(&loan, date(2024, 6, 20), &policy);
        let b = compute_overdue_and_penalty(&loan, date(2024, 6, 20), &policy);
        assert_eq!(a, b);
    }
}
