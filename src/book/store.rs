//! JSON persistence for the loan book
//!
//! The whole collection is rewritten on every save. Loading runs the same
//! checks as [`LoanBook::from_loans`], so a hand-edited file with broken
//! payment records is refused instead of loaded.

use super::LoanBook;
use crate::error::LedgerResult;
use crate::loan::Loan;
use crate::persist::{read_json, write_json};
use log::{debug, info};
use std::path::Path;

impl LoanBook {
    /// Load a book from a JSON file. A missing file yields an empty book.
    pub fn load_json(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let Some(loans) = read_json::<Vec<Loan>>(path)? else {
            info!("No loan book at {}, starting empty", path.display());
            return Ok(LoanBook::new());
        };
        let book = LoanBook::from_loans(loans)?;
        debug!("Loaded {} loans from {}", book.len(), path.display());
        Ok(book)
    }

    /// Overwrite `path` with the full book
    pub fn save_json(&self, path: impl AsRef<Path>) -> LedgerResult<()> {
        let path = path.as_ref();
        write_json(path, self)?;
        debug!("Saved {} loans to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::NewLoan;
    use crate::error::LedgerError;
    use crate::loan::LoanKind;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn sample_book() -> LoanBook {
        let mut book = LoanBook::new();
        book.open_loan(NewLoan {
            kind: LoanKind::Payable,
            counterparty: "Pegadaian".to_string(),
            principal: 2_500_000,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
            interest_rate_percent: 1.25,
            installment_count: 10,
        })
        .unwrap();
        book
    }

    #[test]
    fn test_missing_file_is_empty_book() {
        let temp_dir = TempDir::new().unwrap();
        let book = LoanBook::load_json(temp_dir.path().join("nope.json")).unwrap();
        assert!(book.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.json");

        let book = sample_book();
        book.save_json(&path).unwrap();
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);

        let loaded = LoanBook::load_json(&path).unwrap();
        assert_eq!(loaded, book);
    }

    #[test]
    fn test_load_rejects_overpaid_loan() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.json");

        let mut value = serde_json::to_value(sample_book()).unwrap();
        value[0]["payment_history"] = serde_json::json!([
            { "date": "2024-06-30", "principal_portion": 0, "installments_covered": 4294967295u32 },
            { "date": "2024-07-31", "principal_portion": 0, "installments_covered": 4294967295u32 }
        ]);
        fs::write(&path, value.to_string()).unwrap();

        let err = LoanBook::load_json(&path).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidLoan { .. }));
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("book.json");

        let loan = serde_json::to_value(sample_book()).unwrap()[0].clone();
        fs::write(&path, serde_json::json!([loan.clone(), loan]).to_string()).unwrap();

        assert!(matches!(LoanBook::load_json(&path), Err(LedgerError::InvalidLoan { .. })));
    }
}
