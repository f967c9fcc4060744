//! Sanction Letter Export Payload
//!
//! The orchestrator's only obligation toward document export is to supply
//! the data block below; rendering the downloadable letter is an external
//! concern.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lendora_core::provider::LoanDetails;

use crate::profiles::ApplicantProfile;
use crate::underwrite::Decision;

/// Data block handed to the external document generator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SanctionLetterData {
    /// Applicant full name
    pub applicant_name: String,

    /// Requested principal in USD
    pub loan_amount: f64,

    /// Annual interest rate in percent
    pub interest_rate: Decimal,

    /// Term in months
    pub term: u32,

    /// Monthly installment in USD
    pub monthly_installment: Decimal,

    /// Stated loan purpose
    pub purpose: String,

    /// Applicant credit score
    pub credit_score: u16,

    /// Approval outcome
    pub approved: bool,

    /// Reasons for rejection, empty when approved
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rejection_reasons: Vec<String>,

    /// Decision date
    pub date: DateTime<Utc>,

    /// Letter reference, e.g. `LEN-MB2K3F`
    pub reference: String,
}

impl SanctionLetterData {
    /// Assemble the export payload from a decided session
    pub fn assemble(profile: &ApplicantProfile, loan: &LoanDetails, decision: &Decision) -> Self {
        let date = Utc::now();
        Self {
            applicant_name: profile.name.clone(),
            loan_amount: loan.amount,
            interest_rate: decision.interest_rate,
            term: loan.term,
            monthly_installment: decision.monthly_installment,
            purpose: loan.purpose.clone(),
            credit_score: profile.credit_score,
            approved: decision.approved,
            rejection_reasons: decision.rejection_reasons.clone(),
            date,
            reference: reference_from(date),
        }
    }
}

/// `LEN-` followed by the decision timestamp in base-36, uppercased
fn reference_from(date: DateTime<Utc>) -> String {
    format!("LEN-{}", to_base36(date.timestamp_millis().max(0) as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileStore;
    use crate::underwrite::evaluate;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(1_000), "RS");
    }

    #[test]
    fn test_assemble_approved() {
        let profile = ProfileStore::new().get("excellent").unwrap();
        let loan = LoanDetails::default();
        let decision = evaluate(&profile, &loan);

        let letter = SanctionLetterData::assemble(&profile, &loan, &decision);
        assert!(letter.approved);
        assert_eq!(letter.applicant_name, "Sarah Johnson");
        assert_eq!(letter.credit_score, 780);
        assert!(letter.rejection_reasons.is_empty());
        assert!(letter.reference.starts_with("LEN-"));
    }

    #[test]
    fn test_assemble_rejected_carries_reasons() {
        let profile = ProfileStore::new().get("rejected").unwrap();
        let loan = LoanDetails::default();
        let decision = evaluate(&profile, &loan);

        let letter = SanctionLetterData::assemble(&profile, &loan, &decision);
        assert!(!letter.approved);
        assert_eq!(letter.rejection_reasons.len(), 2);
        // Display-only rate is still present on rejections.
        assert_eq!(letter.interest_rate.to_string(), "14.99");
    }
}
