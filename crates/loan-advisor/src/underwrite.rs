//! Underwriting Decision Rules
//!
//! Demo placeholder rules: hardcoded threshold comparisons plus a standard
//! amortizing-loan installment. The interest rate is computed on every
//! branch, including rejections, where it is display-only. That matches
//! the shipped behavior and is intentional.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use lendora_core::provider::LoanDetails;

use crate::profiles::ApplicantProfile;

/// Minimum credit score for approval
pub const MIN_CREDIT_SCORE: u16 = 580;

/// Minimum employment tenure in years
pub const MIN_EMPLOYMENT_YEARS: f64 = 0.5;

/// Maximum number of existing loans
pub const MAX_EXISTING_LOANS: u8 = 3;

/// Computed approve/reject outcome with pricing terms
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the application is approved
    pub approved: bool,

    /// Annual interest rate in percent (display-only on rejections)
    pub interest_rate: Decimal,

    /// Monthly installment in USD, rounded to cents
    pub monthly_installment: Decimal,

    /// Human-readable reasons for each failed threshold
    pub rejection_reasons: Vec<String>,
}

/// Rate table keyed by credit score
pub fn interest_rate(credit_score: u16) -> Decimal {
    if credit_score >= 750 {
        dec!(8.99)
    } else if credit_score >= 700 {
        dec!(10.99)
    } else if credit_score >= 650 {
        dec!(12.99)
    } else {
        dec!(14.99)
    }
}

/// Standard amortizing-loan installment:
/// `principal * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
///
/// A zero rate cannot come out of the current rate table, but the formula
/// divides by zero there, so it is guarded as straight principal/term.
pub fn monthly_installment(principal: Decimal, annual_rate: Decimal, term_months: u32) -> Decimal {
    if term_months == 0 {
        return principal.round_dp(2);
    }
    if annual_rate.is_zero() {
        return (principal / Decimal::from(term_months)).round_dp(2);
    }

    // The power term exceeds what fixed-point arithmetic covers; compute
    // it in f64 and round the result back to cents.
    let r = annual_rate.to_f64().unwrap_or_default() / 100.0 / 12.0;
    let factor = (1.0 + r).powi(term_months as i32);
    let emi = principal.to_f64().unwrap_or_default() * r * factor / (factor - 1.0);

    Decimal::from_f64_retain(emi)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

/// Evaluate a profile against the requested loan terms.
///
/// Pure function: identical inputs always yield an identical decision.
pub fn evaluate(profile: &ApplicantProfile, loan: &LoanDetails) -> Decision {
    let mut rejection_reasons = Vec::new();

    if profile.credit_score < MIN_CREDIT_SCORE {
        rejection_reasons.push(format!(
            "Credit score {} is below the minimum of {MIN_CREDIT_SCORE}",
            profile.credit_score
        ));
    }
    if profile.employment_years < MIN_EMPLOYMENT_YEARS {
        rejection_reasons.push(format!(
            "Employment tenure of {} years is below the minimum of {MIN_EMPLOYMENT_YEARS}",
            profile.employment_years
        ));
    }
    if profile.existing_loans > MAX_EXISTING_LOANS {
        rejection_reasons.push(format!(
            "{} existing loans exceeds the maximum of {MAX_EXISTING_LOANS}",
            profile.existing_loans
        ));
    }

    let approved = rejection_reasons.is_empty();
    let interest_rate = interest_rate(profile.credit_score);
    let principal = Decimal::from_f64_retain(loan.amount).unwrap_or(Decimal::ZERO);
    let monthly_installment = monthly_installment(principal, interest_rate, loan.term);

    Decision {
        approved,
        interest_rate,
        monthly_installment,
        rejection_reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileStore;

    fn loan(amount: f64, term: u32) -> LoanDetails {
        LoanDetails {
            amount,
            term,
            purpose: "Personal".into(),
        }
    }

    #[test]
    fn test_excellent_profile_approved() {
        let profile = ProfileStore::new().get("excellent").unwrap();
        let decision = evaluate(&profile, &loan(25_000.0, 36));

        assert!(decision.approved);
        assert!(decision.rejection_reasons.is_empty());
        assert_eq!(decision.interest_rate, dec!(8.99));
        assert_eq!(decision.monthly_installment, dec!(794.88));
    }

    #[test]
    fn test_rejected_profile_keeps_display_rate() {
        let profile = ProfileStore::new().get("rejected").unwrap();
        let decision = evaluate(&profile, &loan(25_000.0, 36));

        // 4 existing loans > 3 and score 520 < 580; employment 0.5 passes.
        assert!(!decision.approved);
        assert_eq!(decision.rejection_reasons.len(), 2);
        assert_eq!(decision.interest_rate, dec!(14.99));
    }

    #[test]
    fn test_rate_table_boundaries() {
        assert_eq!(interest_rate(750), dec!(8.99));
        assert_eq!(interest_rate(749), dec!(10.99));
        assert_eq!(interest_rate(700), dec!(10.99));
        assert_eq!(interest_rate(699), dec!(12.99));
        assert_eq!(interest_rate(650), dec!(12.99));
        assert_eq!(interest_rate(649), dec!(14.99));
        assert_eq!(interest_rate(300), dec!(14.99));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let profile = ProfileStore::new().get("good").unwrap();
        let request = loan(10_000.0, 24);

        let first = evaluate(&profile, &request);
        let second = evaluate(&profile, &request);

        assert_eq!(first.approved, second.approved);
        assert_eq!(first.interest_rate, second.interest_rate);
        assert_eq!(first.monthly_installment, second.monthly_installment);
        assert_eq!(first.rejection_reasons, second.rejection_reasons);
    }

    #[test]
    fn test_zero_rate_guard() {
        let emi = monthly_installment(dec!(12_000), Decimal::ZERO, 12);
        assert_eq!(emi, dec!(1000));
    }

    #[test]
    fn test_zero_term_guard() {
        let emi = monthly_installment(dec!(5_000), dec!(8.99), 0);
        assert_eq!(emi, dec!(5000.00));
    }
}
