//! Loan and payment records as persisted in the loan book

use crate::calendar::lenient_date;
use crate::engine::{compute_amortization, Amortization};
use crate::error::{LedgerError, LedgerResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who owes whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanKind {
    /// Money lent out; the counterparty owes us ("piutang")
    #[serde(alias = "piutang")]
    Receivable,
    /// Money borrowed; we owe the counterparty ("hutang")
    #[serde(alias = "hutang", alias = "utang")]
    Payable,
}

impl LoanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanKind::Receivable => "receivable",
            LoanKind::Payable => "payable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    Active,
    #[serde(alias = "completed")]
    Settled,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Settled => "settled",
        }
    }
}

/// One recorded payment against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    /// Amount applied to installments (principal plus flat interest)
    pub principal_portion: i64,
    /// Amount applied to accrued late fees
    #[serde(default)]
    pub penalty_portion: i64,
    /// Number of installments this payment fully satisfies
    pub installments_covered: u32,
}

impl Payment {
    pub fn total(&self) -> i64 {
        self.principal_portion + self.penalty_portion
    }
}

/// A flat-rate installment loan, either receivable or payable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: u64,
    pub kind: LoanKind,
    pub counterparty: String,

    /// Amount lent or borrowed, in whole currency units
    pub principal: i64,

    /// First day of the loan; installment N falls due N months later.
    /// `None` when the stored date is missing or unparseable.
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDate>,

    /// Flat interest rate charged per installment period, in percent
    #[serde(default)]
    pub interest_rate_percent: f64,

    pub installment_count: u32,

    #[serde(default)]
    pub status: LoanStatus,

    #[serde(default)]
    pub completion_date: Option<NaiveDate>,

    #[serde(default)]
    pub payment_history: Vec<Payment>,
}

impl Loan {
    /// Flat-rate totals for this loan's terms
    pub fn amortization(&self) -> Amortization {
        compute_amortization(self.principal, self.interest_rate_percent, self.installment_count)
    }

    /// Installments covered by all recorded payments (saturates at `u32::MAX`)
    pub fn paid_installments(&self) -> u32 {
        let total: u64 = self.payment_history.iter().map(|p| p.installments_covered as u64).sum();
        u32::try_from(total).unwrap_or(u32::MAX)
    }

    pub fn remaining_installments(&self) -> u32 {
        self.installment_count.saturating_sub(self.paid_installments())
    }

    /// Amount paid toward installments, excluding late fees
    pub fn paid_amount(&self) -> i64 {
        self.payment_history
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.principal_portion))
    }

    /// Late fees collected so far
    pub fn penalties_paid(&self) -> i64 {
        self.payment_history
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.penalty_portion))
    }

    /// Amount still owed on installments, late fees excluded
    pub fn remaining_balance(&self) -> i64 {
        let amortization = self.amortization();
        let covered = (self.paid_installments() as i64).saturating_mul(amortization.installment_amount());
        amortization.total_amount_rounded().saturating_sub(covered).max(0)
    }

    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Settled
    }

    /// Check the record invariants: positive terms, every payment covering at
    /// least one installment with non-negative amounts, no more installments
    /// covered than scheduled, and `settled` exactly when all are covered.
    pub fn validate(&self) -> LedgerResult<()> {
        let invalid = |field: &str, reason: String| LedgerError::InvalidLoan {
            field: format!("loan {}: {}", self.id, field),
            reason,
        };

        if self.principal <= 0 {
            return Err(invalid("principal", format!("must be positive, got {}", self.principal)));
        }
        if self.installment_count == 0 {
            return Err(invalid("installment_count", "must be at least 1".to_string()));
        }
        if !self.interest_rate_percent.is_finite() || self.interest_rate_percent < 0.0 {
            return Err(invalid(
                "interest_rate_percent",
                format!("must be a non-negative number, got {}", self.interest_rate_percent),
            ));
        }
        for (i, payment) in self.payment_history.iter().enumerate() {
            if payment.installments_covered == 0 {
                return Err(invalid("payment_history", format!("payment {} covers no installment", i + 1)));
            }
            if payment.principal_portion < 0 || payment.penalty_portion < 0 {
                return Err(invalid("payment_history", format!("payment {} has a negative amount", i + 1)));
            }
        }

        let covered: u64 = self.payment_history.iter().map(|p| p.installments_covered as u64).sum();
        let scheduled = self.installment_count as u64;
        if covered > scheduled {
            return Err(invalid(
                "payment_history",
                format!("covers {covered} installments but only {scheduled} are scheduled"),
            ));
        }
        match (self.status, covered == scheduled) {
            (LoanStatus::Settled, false) => Err(invalid(
                "status",
                format!("settled with {} of {} installments unpaid", scheduled - covered, scheduled),
            )),
            (LoanStatus::Active, true) => Err(invalid("status", "active although every installment is paid".to_string())),
            _ => Ok(()),
        }
    }

    /// Share of the total amount paid so far, capped at 100
    pub fn progress_percent(&self) -> f64 {
        let total = self.amortization().total_amount;
        if total <= 0.0 {
            return 0.0;
        }
        (self.paid_amount() as f64 / total * 100.0).min(100.0)
    }
}
