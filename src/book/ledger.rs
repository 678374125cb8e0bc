//! The loan book: an explicitly owned collection of loans and the only place
//! loans are created, paid, reversed or deleted.

use crate::config::PenaltyPolicy;
use crate::engine::{allocate_payment, reverse_last_payment, PaymentAllocation};
use crate::error::{LedgerError, LedgerResult};
use crate::loan::{Loan, LoanKind, LoanStatus, Payment};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// Terms for a new loan, as submitted by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoan {
    pub kind: LoanKind,
    pub counterparty: String,
    pub principal: i64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub interest_rate_percent: f64,
    pub installment_count: u32,
}

impl NewLoan {
    fn validate(&self) -> LedgerResult<()> {
        if self.counterparty.trim().is_empty() {
            return Err(LedgerError::invalid_loan("counterparty", "must not be empty"));
        }
        if self.principal <= 0 {
            return Err(LedgerError::invalid_loan("principal", "must be positive"));
        }
        if self.installment_count == 0 {
            return Err(LedgerError::invalid_loan("installment_count", "must be at least 1"));
        }
        if !self.interest_rate_percent.is_finite() || self.interest_rate_percent < 0.0 {
            return Err(LedgerError::invalid_loan("interest_rate_percent", "must be a non-negative number"));
        }
        Ok(())
    }
}

/// Outstanding installment balances of active loans, split by direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OutstandingTotals {
    /// Still owed to us
    pub receivable: i64,
    /// Still owed by us
    pub payable: i64,
}

impl OutstandingTotals {
    /// Receivables minus payables
    pub fn net(&self) -> i64 {
        self.receivable.saturating_sub(self.payable)
    }
}

/// Ordered loan collection, newest first.
///
/// Persisted as a plain JSON array of loans. Deserializing checks every loan
/// with [`Loan::validate`] and rejects duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Loan>")]
pub struct LoanBook {
    loans: Vec<Loan>,
}

impl Serialize for LoanBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.loans.serialize(serializer)
    }
}

impl TryFrom<Vec<Loan>> for LoanBook {
    type Error = LedgerError;

    fn try_from(loans: Vec<Loan>) -> LedgerResult<Self> {
        Self::from_loans(loans)
    }
}

impl LoanBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from stored loans, keeping their order
    pub fn from_loans(loans: Vec<Loan>) -> LedgerResult<Self> {
        let mut seen = HashSet::with_capacity(loans.len());
        for loan in &loans {
            loan.validate()?;
            if !seen.insert(loan.id) {
                return Err(LedgerError::InvalidLoan {
                    field: "id".to_string(),
                    reason: format!("loan id {} appears more than once", loan.id),
                });
            }
        }
        Ok(Self { loans })
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    fn next_id(&self) -> u64 {
        self.loans.iter().map(|l| l.id).max().map_or(1, |max| max.saturating_add(1))
    }

    /// Validate and record a new active loan, returning its id
    pub fn open_loan(&mut self, new_loan: NewLoan) -> LedgerResult<u64> {
        new_loan.validate()?;

        let id = self.next_id();
        let loan = Loan {
            id,
            kind: new_loan.kind,
            counterparty: new_loan.counterparty.trim().to_string(),
            principal: new_loan.principal,
            start_date: Some(new_loan.start_date),
            interest_rate_percent: new_loan.interest_rate_percent,
            installment_count: new_loan.installment_count,
            status: LoanStatus::Active,
            completion_date: None,
            payment_history: Vec::new(),
        };
        info!(
            "Opened {} loan {} with {} for {} over {} installments",
            loan.kind.as_str(),
            id,
            loan.counterparty,
            loan.principal,
            loan.installment_count
        );
        self.loans.insert(0, loan);
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }

    fn require_mut(&mut self, id: u64) -> LedgerResult<&mut Loan> {
        self.loans
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(LedgerError::LoanNotFound(id))
    }

    pub fn active(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|l| !l.is_settled())
    }

    pub fn settled(&self) -> impl Iterator<Item = &Loan> {
        self.loans.iter().filter(|l| l.is_settled())
    }

    /// Loans whose counterparty contains `query`, case-insensitively
    pub fn search(&self, query: &str) -> Vec<&Loan> {
        let needle = query.trim().to_lowercase();
        self.loans
            .iter()
            .filter(|l| l.counterparty.to_lowercase().contains(&needle))
            .collect()
    }

    /// Apply a payment to loan `id`; see [`allocate_payment`]
    pub fn record_payment(
        &mut self,
        id: u64,
        amount: i64,
        as_of: NaiveDate,
        policy: &PenaltyPolicy,
    ) -> LedgerResult<PaymentAllocation> {
        let loan = self.require_mut(id)?;
        allocate_payment(loan, amount, as_of, policy)
    }

    /// Undo the most recent payment on loan `id`
    pub fn reverse_last_payment(&mut self, id: u64) -> LedgerResult<Payment> {
        let loan = self.require_mut(id)?;
        reverse_last_payment(loan)
    }

    /// Remove loan `id` for good, returning it
    pub fn delete(&mut self, id: u64) -> LedgerResult<Loan> {
        let pos = self
            .loans
            .iter()
            .position(|l| l.id == id)
            .ok_or(LedgerError::LoanNotFound(id))?;
        let loan = self.loans.remove(pos);
        info!("Deleted loan {} ({})", id, loan.counterparty);
        Ok(loan)
    }

    /// Remaining installment balances across active loans
    pub fn outstanding_totals(&self) -> OutstandingTotals {
        self.active().fold(OutstandingTotals::default(), |mut totals, loan| {
            let remaining = loan.remaining_balance();
            match loan.kind {
                LoanKind::Receivable => totals.receivable = totals.receivable.saturating_add(remaining),
                LoanKind::Payable => totals.payable = totals.payable.saturating_add(remaining),
            }
            totals
        })
    }
}
