//! Flat-rate amortization
//!
//! Interest is charged once on the original principal for every installment
//! period (not on a declining balance):
//!
//! ```text
//! total_interest  = principal × rate% × installments
//! total_amount    = principal + total_interest
//! per_installment = total_amount / installments
//! ```

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Amortization {
    pub total_interest: f64,
    pub total_amount: f64,
    /// Unrounded installment; use `installment_amount()` for money movements
    pub per_installment: f64,
}

impl Amortization {
    /// Installment rounded to the nearest whole currency unit.
    /// This is the amount every overdue sum, allocation and balance uses.
    pub fn installment_amount(&self) -> i64 {
        self.per_installment.round() as i64
    }

    /// Total amount rounded to the nearest whole currency unit
    pub fn total_amount_rounded(&self) -> i64 {
        self.total_amount.round() as i64
    }
}

/// Compute flat-rate totals.
///
/// Degenerate terms (no installments, non-positive principal, negative or
/// non-finite rate) yield an all-zero result instead of an error.
pub fn compute_amortization(principal: i64, rate_percent: f64, installment_count: u32) -> Amortization {
    if installment_count == 0 || principal <= 0 || !rate_percent.is_finite() || rate_percent < 0.0 {
        return Amortization::default();
    }

    let principal = principal as f64;
    let n = installment_count as f64;
    let total_interest = principal * (rate_percent / 100.0) * n;
    let total_amount = principal + total_interest;

    Amortization {
        total_interest,
        total_amount,
        per_installment: total_amount / n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_flat_rate_totals() {
        // 10M over 12 months at 1.5% flat
        let a = compute_amortization(10_000_000, 1.5, 12);
        assert_relative_eq!(a.total_interest, 1_800_000.0, epsilon = 1e-6);
        assert_relative_eq!(a.total_amount, 11_800_000.0, epsilon = 1e-6);
        assert_relative_eq!(a.per_installment, 983_333.333_333, epsilon = 1e-3);
        assert_eq!(a.installment_amount(), 983_333);
    }

    #[test]
    fn test_total_matches_formula() {
        for &(p, r, n) in &[(1_000_000i64, 0.0, 1u32), (750_000, 2.5, 6), (3_333_333, 0.75, 36)] {
            let a = compute_amortization(p, r, n);
            let expected = p as f64 + p as f64 * r / 100.0 * n as f64;
            assert_relative_eq!(a.total_amount, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rounded_installments_stay_within_tolerance() {
        for &(p, r, n) in &[(1_000_000i64, 1.0, 3u32), (999_999, 2.0, 7), (5_000_001, 1.25, 24)] {
            let a = compute_amortization(p, r, n);
            let scheduled = (a.installment_amount() * n as i64) as f64;
            assert!((scheduled - a.total_amount).abs() <= (n - 1) as f64);
        }
    }

    #[test]
    fn test_zero_rate() {
        let a = compute_amortization(1_200_000, 0.0, 4);
        assert_eq!(a.total_interest, 0.0);
        assert_eq!(a.installment_amount(), 300_000);
    }

    #[test]
    fn test_degenerate_inputs_return_zero() {
        assert_eq!(compute_amortization(1_000_000, 2.0, 0), Amortization::default());
        assert_eq!(compute_amortization(0, 2.0, 12), Amortization::default());
        assert_eq!(compute_amortization(-5, 2.0, 12), Amortization::default());
        assert_eq!(compute_amortization(1_000_000, f64::NAN, 12), Amortization::default());
        assert_eq!(compute_amortization(1_000_000, -1.0, 12), Amortization::default());
        assert_eq!(Amortization::default().installment_amount(), 0);
    }
}
