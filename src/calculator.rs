//! Compound-interest savings calculator
//!
//! Two modes:
//! - No compounding schedule: a lump sum grows annually, `FV = P × (1 + r)^t`
//! - With a schedule of `n` periods per year and a contribution `PMT` each period:
//!   `FV = P × (1 + r/n)^(n·t) + PMT × ((1 + r/n)^(n·t) − 1) / (r/n)`

use serde::{Deserialize, Serialize};

/// How often interest compounds and contributions are made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    /// Annual growth of the lump sum only, no contributions
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Compounding {
    /// Periods per year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Compounding::None | Compounding::Yearly => 1,
            Compounding::Daily => 365,
            Compounding::Weekly => 52,
            Compounding::Monthly => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CompoundResult {
    pub future_value: f64,
    /// Starting principal plus all contributions
    pub total_invested: f64,
    pub total_interest: f64,
}

/// Project the future value of a savings plan.
///
/// `years <= 0` (or non-finite inputs) returns an all-zero result.
pub fn compute_compound(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    compounding: Compounding,
    contribution: f64,
) -> CompoundResult {
    if !years.is_finite() || years <= 0.0 || !principal.is_finite() || !annual_rate_percent.is_finite() || !contribution.is_finite() {
        return CompoundResult::default();
    }

    let r = annual_rate_percent / 100.0;

    let (future_value, total_contributions) = match compounding {
        Compounding::None => (principal * (1.0 + r).powf(years), 0.0),
        _ => {
            let n = compounding.periods_per_year() as f64;
            let rate_per_period = r / n;
            let total_periods = n * years;
            let growth = (1.0 + rate_per_period).powf(total_periods);

            let lump_sum = principal * growth;
            let series = if rate_per_period == 0.0 {
                contribution * total_periods
            } else {
                contribution * ((growth - 1.0) / rate_per_period)
            };
            (lump_sum + series, contribution * total_periods)
        }
    };

    let total_invested = principal + total_contributions;
    CompoundResult {
        future_value,
        total_invested,
        total_interest: future_value - total_invested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lump_sum_annual_growth() {
        let res = compute_compound(10_000_000.0, 10.0, 2.0, Compounding::None, 500_000.0);
        // Contributions are ignored without a schedule
        assert_relative_eq!(res.future_value, 12_100_000.0, epsilon = 1e-6);
        assert_relative_eq!(res.total_invested, 10_000_000.0);
        assert_relative_eq!(res.total_interest, 2_100_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_monthly_with_contributions() {
        let res = compute_compound(1_000_000.0, 12.0, 1.0, Compounding::Monthly, 100_000.0);
        let growth = 1.01_f64.powi(12);
        let expected = 1_000_000.0 * growth + 100_000.0 * (growth - 1.0) / 0.01;
        assert_relative_eq!(res.future_value, expected, max_relative = 1e-12);
        assert_relative_eq!(res.total_invested, 2_200_000.0);
        assert_relative_eq!(res.total_interest, expected - 2_200_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_rate_series_is_plain_sum() {
        let res = compute_compound(0.0, 0.0, 2.0, Compounding::Weekly, 10_000.0);
        assert_relative_eq!(res.future_value, 1_040_000.0, epsilon = 1e-6);
        assert_relative_eq!(res.total_interest, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(Compounding::Daily.periods_per_year(), 365);
        assert_eq!(Compounding::Weekly.periods_per_year(), 52);
        assert_eq!(Compounding::Monthly.periods_per_year(), 12);
        assert_eq!(Compounding::Yearly.periods_per_year(), 1);
    }

    #[test]
    fn test_zero_years_is_degenerate() {
        assert_eq!(compute_compound(1_000.0, 5.0, 0.0, Compounding::Monthly, 10.0), CompoundResult::default());
        assert_eq!(compute_compound(1_000.0, 5.0, -1.0, Compounding::None, 0.0), CompoundResult::default());
        assert_eq!(compute_compound(1_000.0, 5.0, f64::NAN, Compounding::None, 0.0), CompoundResult::default());
    }
}
