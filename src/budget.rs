//! Income and expense journal
//!
//! Entries are kept newest first. Totals are recomputed from the entries on
//! every call, so deleting an entry needs no bookkeeping.

use crate::calendar::lenient_date;
use crate::error::{LedgerError, LedgerResult};
use crate::persist::{read_json, write_json};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

/// One recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub id: u64,
    #[serde(alias = "type")]
    pub kind: EntryKind,
    /// Always positive; `kind` gives the direction
    pub amount: i64,
    #[serde(alias = "desc")]
    pub description: String,
    #[serde(default, with = "lenient_date")]
    pub date: Option<NaiveDate>,
}

impl BudgetEntry {
    /// Amount with its sign: income positive, expense negative
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    fn validate(&self) -> LedgerResult<()> {
        if self.amount <= 0 {
            return Err(LedgerError::InvalidRecord {
                record: "budget entry",
                field: "amount".to_string(),
                reason: format!("entry {} has non-positive amount {}", self.id, self.amount),
            });
        }
        if self.description.trim().is_empty() {
            return Err(LedgerError::InvalidRecord {
                record: "budget entry",
                field: "description".to_string(),
                reason: format!("entry {} has no description", self.id),
            });
        }
        Ok(())
    }
}

/// A transaction as submitted by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    pub kind: EntryKind,
    pub amount: i64,
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BudgetTotals {
    pub income: i64,
    pub expense: i64,
}

impl BudgetTotals {
    /// Income minus expense
    pub fn balance(&self) -> i64 {
        self.income.saturating_sub(self.expense)
    }
}

/// Budget journal, persisted as a plain JSON array of entries
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<BudgetEntry>")]
pub struct Budget {
    entries: Vec<BudgetEntry>,
}

impl Serialize for Budget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl TryFrom<Vec<BudgetEntry>> for Budget {
    type Error = LedgerError;

    fn try_from(entries: Vec<BudgetEntry>) -> LedgerResult<Self> {
        Self::from_entries(entries)
    }
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a journal from stored entries, keeping their order
    pub fn from_entries(entries: Vec<BudgetEntry>) -> LedgerResult<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.id) {
                return Err(LedgerError::invalid_record("budget entry", "id", "duplicate id"));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&BudgetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Record a transaction and return its id
    pub fn record(&mut self, new_entry: NewEntry) -> LedgerResult<u64> {
        let id = self.entries.iter().map(|e| e.id).max().map_or(1, |max| max.saturating_add(1));
        let entry = BudgetEntry {
            id,
            kind: new_entry.kind,
            amount: new_entry.amount,
            description: new_entry.description.trim().to_string(),
            date: Some(new_entry.date),
        };
        entry.validate()?;

        info!("Recorded {} {} ({})", entry.kind.as_str(), entry.amount, entry.description);
        self.entries.insert(0, entry);
        Ok(id)
    }

    pub fn delete(&mut self, id: u64) -> LedgerResult<BudgetEntry> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::RecordNotFound { record: "budget entry", id })?;
        Ok(self.entries.remove(pos))
    }

    pub fn totals(&self) -> BudgetTotals {
        self.entries.iter().fold(BudgetTotals::default(), |mut totals, entry| {
            match entry.kind {
                EntryKind::Income => totals.income = totals.income.saturating_add(entry.amount),
                EntryKind::Expense => totals.expense = totals.expense.saturating_add(entry.amount),
            }
            totals
        })
    }

    /// Load from a JSON file. A missing file yields an empty journal.
    pub fn load_json(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        let Some(entries) = read_json::<Vec<BudgetEntry>>(path)? else {
            info!("No budget at {}, starting empty", path.display());
            return Ok(Budget::new());
        };
        let budget = Budget::from_entries(entries)?;
        debug!("Loaded {} budget entries from {}", budget.len(), path.display());
        Ok(budget)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> LedgerResult<()> {
        write_json(path.as_ref(), self)
    }
}
