//! Flat CSV rows for exporting the loan book, the budget journal and as-of
//! loan reports

use crate::budget::BudgetEntry;
use crate::calendar::format_date;
use crate::config::LedgerConfig;
use crate::engine::{compute_overdue_and_penalty, loan_due_status, next_due_date};
use crate::error::LedgerResult;
use crate::loan::{Loan, Payment};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// One exported loan; payments are packed into a single `;`-separated field
/// of `date:principal:penalty:installments` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub id: u64,
    pub kind: &'static str,
    pub counterparty: String,
    pub start_date: String,
    pub principal: i64,
    pub interest_rate_percent: f64,
    pub installment_count: u32,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub status: &'static str,
    pub completion_date: String,
    pub payments: String,
}

impl ExportRow {
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            kind: loan.kind.as_str(),
            counterparty: loan.counterparty.clone(),
            start_date: loan.start_date.map(format_date).unwrap_or_default(),
            principal: loan.principal,
            interest_rate_percent: loan.interest_rate_percent,
            installment_count: loan.installment_count,
            total_amount: loan.amortization().total_amount_rounded(),
            paid_amount: loan.paid_amount(),
            status: loan.status.as_str(),
            completion_date: loan.completion_date.map(format_date).unwrap_or_default(),
            payments: pack_payments(&loan.payment_history),
        }
    }
}

fn pack_payments(payments: &[Payment]) -> String {
    payments
        .iter()
        .map(|p| {
            format!(
                "{}:{}:{}:{}",
                format_date(p.date),
                p.principal_portion,
                p.penalty_portion,
                p.installments_covered
            )
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// A loan's position as of a reporting date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub id: u64,
    pub kind: &'static str,
    pub counterparty: String,
    pub status: &'static str,
    pub installment_amount: i64,
    pub installments_paid: u32,
    pub installment_count: u32,
    pub next_due_date: String,
    pub due_status: String,
    pub overdue_installments: u32,
    pub overdue_amount: i64,
    pub penalty_periods: u32,
    pub penalty_amount: i64,
    pub remaining_balance: i64,
    pub progress_percent: f64,
}

impl SnapshotRow {
    pub fn build(loan: &Loan, as_of: NaiveDate, config: &LedgerConfig) -> Self {
        let overdue = compute_overdue_and_penalty(loan, as_of, &config.penalty);
        let next_due = if loan.is_settled() { None } else { next_due_date(loan) };

        Self {
            id: loan.id,
            kind: loan.kind.as_str(),
            counterparty: loan.counterparty.clone(),
            status: loan.status.as_str(),
            installment_amount: loan.amortization().installment_amount(),
            installments_paid: loan.paid_installments(),
            installment_count: loan.installment_count,
            next_due_date: next_due.map(format_date).unwrap_or_default(),
            due_status: loan_due_status(loan, as_of, config.due_soon_days).to_string(),
            overdue_installments: overdue.overdue_installment_count,
            overdue_amount: overdue.overdue_installment_amount,
            penalty_periods: overdue.periods_late,
            penalty_amount: overdue.penalty_amount,
            remaining_balance: overdue.remaining_principal_balance,
            progress_percent: (loan.progress_percent() * 100.0).round() / 100.0,
        }
    }
}

/// One budget transaction, with the column names of the original app's export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    #[serde(rename = "Tanggal")]
    pub date: String,
    #[serde(rename = "Tipe")]
    pub kind: &'static str,
    #[serde(rename = "Deskripsi")]
    pub description: String,
    #[serde(rename = "Nominal")]
    pub amount: i64,
}

impl BudgetRow {
    pub fn from_entry(entry: &BudgetEntry) -> Self {
        Self {
            date: entry.date.map(format_date).unwrap_or_default(),
            kind: entry.kind.as_str(),
            description: entry.description.clone(),
            amount: entry.amount,
        }
    }
}

/// Write rows as CSV with a header line
pub fn write_rows<W: Write, R: Serialize>(writer: W, rows: &[R]) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
