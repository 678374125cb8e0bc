//! Error types for ledger operations

use thiserror::Error;

/// Result alias used throughout the crate
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The tendered amount cannot cover a single installment after penalty
    #[error("insufficient payment: tendered {tendered}, at least {required} needed to cover one installment")]
    InsufficientPayment { tendered: i64, required: i64 },

    #[error("loan {0} is already settled")]
    LoanSettled(u64),

    #[error("loan {0} has no payments to reverse")]
    EmptyHistory(u64),

    #[error("loan {0} not found")]
    LoanNotFound(u64),

    #[error("invalid loan: {field} ({reason})")]
    InvalidLoan { field: String, reason: String },

    #[error("invalid {record}: {field} ({reason})")]
    InvalidRecord { record: &'static str, field: String, reason: String },

    #[error("{record} {id} not found")]
    RecordNotFound { record: &'static str, id: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl LedgerError {
    pub(crate) fn invalid_loan(field: &str, reason: &str) -> Self {
        LedgerError::InvalidLoan {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_record(record: &'static str, field: &str, reason: &str) -> Self {
        LedgerError::InvalidRecord {
            record,
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
