//! Payment allocation and reversal
//!
//! A tendered amount is applied in a fixed order:
//! 1. accrued late fees
//! 2. overdue installments (whole installments only)
//! 3. upcoming installments (whole installments only)
//!
//! Whatever cannot buy a whole installment is returned as `remainder`.
//! Nothing is written to the loan unless at least one installment is covered.

use crate::config::PenaltyPolicy;
use crate::engine::overdue::compute_overdue_and_penalty;
use crate::error::{LedgerError, LedgerResult};
use crate::loan::{Loan, LoanStatus, Payment};
use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::Serialize;

/// Outcome of a successful allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentAllocation {
    pub penalty_portion: i64,
    pub overdue_installments_covered: u32,
    pub upcoming_installments_covered: u32,
    pub installments_covered: u32,
    pub principal_portion: i64,
    /// Part of the tendered amount left unapplied
    pub remainder: i64,
    /// True when this payment covered the last installment
    pub settled: bool,
}

/// Work out how `amount_tendered` would be applied, without touching the loan
pub fn plan_allocation(
    loan: &Loan,
    amount_tendered: i64,
    as_of: NaiveDate,
    policy: &PenaltyPolicy,
) -> LedgerResult<PaymentAllocation> {
    if loan.is_settled() || loan.remaining_installments() == 0 {
        return Err(LedgerError::LoanSettled(loan.id));
    }

    let installment = loan.amortization().installment_amount();
    if installment <= 0 {
        return Err(LedgerError::invalid_loan(
            "installment_amount",
            "loan terms produce a zero installment",
        ));
    }

    let snapshot = compute_overdue_and_penalty(loan, as_of, policy);
    let tendered = amount_tendered.max(0);

    let penalty_portion = snapshot.penalty_amount.min(tendered);
    let mut available = tendered - penalty_portion;

    let affordable = |available: i64| u32::try_from(available / installment).unwrap_or(u32::MAX);

    let overdue_covered = affordable(available).min(snapshot.overdue_installment_count);
    available -= overdue_covered as i64 * installment;

    let upcoming_cap = loan.remaining_installments() - overdue_covered;
    let upcoming_covered = affordable(available).min(upcoming_cap);
    available -= upcoming_covered as i64 * installment;

    let installments_covered = overdue_covered + upcoming_covered;
    if installments_covered == 0 {
        return Err(LedgerError::InsufficientPayment {
            tendered: amount_tendered,
            required: snapshot.penalty_amount.saturating_add(installment),
        });
    }

    Ok(PaymentAllocation {
        penalty_portion,
        overdue_installments_covered: overdue_covered,
        upcoming_installments_covered: upcoming_covered,
        installments_covered,
        principal_portion: installments_covered as i64 * installment,
        remainder: available,
        settled: loan.paid_installments().saturating_add(installments_covered) >= loan.installment_count,
    })
}

/// Apply a payment to the loan.
///
/// On success one `Payment` is appended and, when the last installment is
/// covered, the loan is settled as of `as_of`. On failure the loan is unchanged.
pub fn allocate_payment(
    loan: &mut Loan,
    amount_tendered: i64,
    as_of: NaiveDate,
    policy: &PenaltyPolicy,
) -> LedgerResult<PaymentAllocation> {
    let allocation = match plan_allocation(loan, amount_tendered, as_of, policy) {
        Ok(allocation) => allocation,
        Err(e) => {
            warn!("Payment of {} rejected for loan {}: {}", amount_tendered, loan.id, e);
            return Err(e);
        }
    };

    debug!(
        "Loan {}: penalty {}, {} overdue + {} upcoming installments, remainder {}",
        loan.id,
        allocation.penalty_portion,
        allocation.overdue_installments_covered,
        allocation.upcoming_installments_covered,
        allocation.remainder
    );

    loan.payment_history.push(Payment {
        date: as_of,
        principal_portion: allocation.principal_portion,
        penalty_portion: allocation.penalty_portion,
        installments_covered: allocation.installments_covered,
    });

    if allocation.settled {
        loan.status = LoanStatus::Settled;
        loan.completion_date = Some(as_of);
        info!("Loan {} settled on {}", loan.id, as_of);
    }

    Ok(allocation)
}

/// Remove the most recent payment, reopening a settled loan.
pub fn reverse_last_payment(loan: &mut Loan) -> LedgerResult<Payment> {
    let Some(payment) = loan.payment_history.pop() else {
        warn!("Reversal requested for loan {} with no payments", loan.id);
        return Err(LedgerError::EmptyHistory(loan.id));
    };

    if loan.status == LoanStatus::Settled && loan.paid_installments() < loan.installment_count {
        loan.status = LoanStatus::Active;
        loan.completion_date = None;
        info!("Loan {} reopened after reversing payment of {}", loan.id, payment.date);
    }

    Ok(payment)
}
