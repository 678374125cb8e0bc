//! Engine configuration: late-fee policy and due-status window
//!
//! Every field has a serde default so a partial JSON file only needs to
//! mention the values it overrides.

use crate::error::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default late fee charged per elapsed period (5%)
pub const DEFAULT_PENALTY_RATE: f64 = 0.05;

/// Length of one penalty period in days.
/// A fixed 30-day approximation, not calendar-month aware.
pub const DEFAULT_PENALTY_PERIOD_DAYS: i64 = 30;

/// Installments due within this many days are reported as "due soon"
pub const DEFAULT_DUE_SOON_DAYS: i64 = 7;

/// Compounding late-fee policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyPolicy {
    /// Fee charged on the fee-inclusive overdue balance each period (0.05 = 5%)
    #[serde(default = "default_penalty_rate")]
    pub rate_per_period: f64,

    /// Whole days that make up one penalty period
    #[serde(default = "default_period_days")]
    pub period_days: i64,
}

fn default_penalty_rate() -> f64 { DEFAULT_PENALTY_RATE }
fn default_period_days() -> i64 { DEFAULT_PENALTY_PERIOD_DAYS }
fn default_due_soon_days() -> i64 { DEFAULT_DUE_SOON_DAYS }

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            rate_per_period: DEFAULT_PENALTY_RATE,
            period_days: DEFAULT_PENALTY_PERIOD_DAYS,
        }
    }
}

/// Top-level configuration consumed by the engine and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub penalty: PenaltyPolicy,

    /// Window (in days) for classifying an upcoming due date as "due soon"
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            penalty: PenaltyPolicy::default(),
            due_soon_days: DEFAULT_DUE_SOON_DAYS,
        }
    }
}

impl LedgerConfig {
    /// Load from a JSON file and validate
    pub fn from_json_file(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: LedgerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        let rate = self.penalty.rate_per_period;
        if !rate.is_finite() || rate < 0.0 {
            return Err(LedgerError::InvalidConfig(format!(
                "penalty rate must be a non-negative number, got {rate}"
            )));
        }
        if self.penalty.period_days <= 0 {
            return Err(LedgerError::InvalidConfig(format!(
                "penalty period must be at least one day, got {}",
                self.penalty.period_days
            )));
        }
        if self.due_soon_days < 0 {
            return Err(LedgerError::InvalidConfig(format!(
                "due-soon window cannot be negative, got {}",
                self.due_soon_days
            )));
        }
        Ok(())
    }
}
