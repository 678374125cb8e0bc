//! Savings goals: a named target amount and what has been put aside so far

use crate::error::{LedgerError, LedgerResult};
use crate::persist::{read_json, write_json};
use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use std::path::Path;

const RECORD: &str = "savings goal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: u64,
    pub name: String,
    #[serde(alias = "amount")]
    pub target: i64,
    #[serde(default)]
    pub saved: i64,
}

impl SavingsGoal {
    /// Whole percent of the target saved, capped at 100
    pub fn progress_percent(&self) -> u32 {
        if self.target <= 0 {
            return 0;
        }
        let percent = (self.saved as f64 / self.target as f64 * 100.0).round();
        percent.clamp(0.0, 100.0) as u32
    }

    /// Amount still missing, zero once the target is reached
    pub fn remaining(&self) -> i64 {
        self.target.saturating_sub(self.saved).max(0)
    }

    pub fn is_reached(&self) -> bool {
        self.saved >= self.target
    }

    fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::invalid_record(RECORD, "name", "must not be empty"));
        }
        if self.target <= 0 {
            return Err(LedgerError::invalid_record(RECORD, "target", "must be positive"));
        }
        if self.saved < 0 {
            return Err(LedgerError::invalid_record(RECORD, "saved", "cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GoalTotals {
    pub target: i64,
    pub saved: i64,
}

/// Goals in creation order, persisted as a plain JSON array
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Vec<SavingsGoal>")]
pub struct GoalBook {
    goals: Vec<SavingsGoal>,
}

impl Serialize for GoalBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.goals.serialize(serializer)
    }
}

impl TryFrom<Vec<SavingsGoal>> for GoalBook {
    type Error = LedgerError;

    fn try_from(goals: Vec<SavingsGoal>) -> LedgerResult<Self> {
        Self::from_goals(goals)
    }
}

impl GoalBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: Vec<SavingsGoal>) -> LedgerResult<Self> {
        let mut seen = HashSet::with_capacity(goals.len());
        for goal in &goals {
            goal.validate()?;
            if !seen.insert(goal.id) {
                return Err(LedgerError::invalid_record(RECORD, "id", "duplicate id"));
            }
        }
        Ok(Self { goals })
    }

    pub fn goals(&self) -> &[SavingsGoal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&SavingsGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    /// Create a goal with nothing saved yet and return its id
    pub fn add_goal(&mut self, name: &str, target: i64) -> LedgerResult<u64> {
        let id = self.goals.iter().map(|g| g.id).max().map_or(1, |max| max.saturating_add(1));
        let goal = SavingsGoal { id, name: name.trim().to_string(), target, saved: 0 };
        goal.validate()?;

        info!("Created savings goal {} '{}' for {}", id, goal.name, target);
        self.goals.push(goal);
        Ok(id)
    }

    /// Put `amount` towards goal `id`. Saving past the target is allowed.
    pub fn add_savings(&mut self, id: u64, amount: i64) -> LedgerResult<&SavingsGoal> {
        if amount <= 0 {
            return Err(LedgerError::InvalidRecord {
                record: RECORD,
                field: "amount".to_string(),
                reason: format!("deposit must be positive, got {amount}"),
            });
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(LedgerError::RecordNotFound { record: RECORD, id })?;
        goal.saved = goal.saved.saturating_add(amount);
        debug!("Goal {} now at {} of {}", id, goal.saved, goal.target);
        Ok(goal)
    }

    pub fn delete(&mut self, id: u64) -> LedgerResult<SavingsGoal> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(LedgerError::RecordNotFound { record: RECORD, id })?;
        Ok(self.goals.remove(pos))
    }

    pub fn totals(&self) -> GoalTotals {
        self.goals.iter().fold(GoalTotals::default(), |totals, goal| GoalTotals {
            target: totals.target.saturating_add(goal.target),
            saved: totals.saved.saturating_add(goal.saved),
        })
    }

    /// Load from a JSON file. A missing file yields no goals.
    pub fn load_json(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        match read_json::<Vec<SavingsGoal>>(path)? {
            Some(goals) => GoalBook::from_goals(goals),
            None => Ok(GoalBook::new()),
        }
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> LedgerResult<()> {
        write_json(path.as_ref(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn goal(target: i64, saved: i64) -> SavingsGoal {
        SavingsGoal { id: 1, name: "Dana darurat".to_string(), target, saved }
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(goal(1_000_000, 0).progress_percent(), 0);
        assert_eq!(goal(1_000_000, 333_333).progress_percent(), 33);
        assert_eq!(goal(1_000_000, 336_000).progress_percent(), 34);
        assert_eq!(goal(1_000_000, 1_000_000).progress_percent(), 100);
        assert_eq!(goal(1_000_000, 2_500_000).progress_percent(), 100);
        assert_eq!(goal(0, 10).progress_percent(), 0);
    }

    #[test]
    fn test_remaining_and_reached() {
        assert_eq!(goal(500_000, 200_000).remaining(), 300_000);
        assert!(!goal(500_000, 200_000).is_reached());
        assert_eq!(goal(500_000, 700_000).remaining(), 0);
        assert!(goal(500_000, 500_000).is_reached());
    }

    #[test]
    fn test_add_goal_and_savings() {
        let mut goals = GoalBook::new();
        let laptop = goals.add_goal(" Laptop ", 12_000_000).unwrap();
        let trip = goals.add_goal("Liburan", 4_000_000).unwrap();
        assert_eq!((laptop, trip), (1, 2));
        assert_eq!(goals.goals()[0].name, "Laptop");

        goals.add_savings(laptop, 3_000_000).unwrap();
        let updated = goals.add_savings(laptop, 3_000_000).unwrap();
        assert_eq!(updated.saved, 6_000_000);
        assert_eq!(updated.progress_percent(), 50);

        let totals = goals.totals();
        assert_eq!(totals.target, 16_000_000);
        assert_eq!(totals.saved, 6_000_000);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let mut goals = GoalBook::new();
        assert!(matches!(goals.add_goal("", 1_000), Err(LedgerError::InvalidRecord { .. })));
        assert!(goals.add_goal("Motor", 0).is_err());
        assert!(goals.is_empty());

        let id = goals.add_goal("Motor", 20_000_000).unwrap();
        assert!(goals.add_savings(id, 0).is_err());
        assert!(goals.add_savings(id, -100).is_err());
        assert_eq!(goals.get(id).unwrap().saved, 0);
        assert!(matches!(
            goals.add_savings(99, 100),
            Err(LedgerError::RecordNotFound { id: 99, .. })
        ));
    }

    #[test]
    fn test_delete_goal() {
        let mut goals = GoalBook::new();
        let id = goals.add_goal("Kamera", 8_000_000).unwrap();
        assert_eq!(goals.delete(id).unwrap().name, "Kamera");
        assert!(goals.delete(id).is_err());
    }

    #[test]
    fn test_load_stored_goals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        assert!(GoalBook::load_json(&path).unwrap().is_empty());

        std::fs::write(
            &path,
            r#"[{ "id": 1718000000000, "name": "Rumah", "amount": 300000000, "saved": 15000000 }]"#,
        )
        .unwrap();
        let goals = GoalBook::load_json(&path).unwrap();
        assert_eq!(goals.goals()[0].target, 300_000_000);
        assert_eq!(goals.goals()[0].progress_percent(), 5);

        std::fs::write(&path, r#"[{ "id": 1, "name": "Rumah", "amount": 0 }]"#).unwrap();
        assert!(matches!(GoalBook::load_json(&path), Err(LedgerError::InvalidRecord { .. })));

        goals.save_json(&path).unwrap();
        assert_eq!(GoalBook::load_json(&path).unwrap(), goals);
    }
}
