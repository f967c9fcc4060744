//! Mock Applicant Profiles
//!
//! Four fixed records drive deterministic demo outcomes. The store is
//! read-only; profiles are used to enrich the instruction block sent to
//! the generation service and to feed the underwriting rules, never shown
//! verbatim to the end user.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, Result};

/// A mock loan applicant record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// Full name
    pub name: String,

    /// FICO-style credit score
    pub credit_score: u16,

    /// Annual income in USD
    pub income: Decimal,

    /// Employment tenure in years
    pub employment_years: f64,

    /// Count of existing loans
    pub existing_loans: u8,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,

    /// Employer verification flag
    pub employer_verified: bool,

    /// Address verification flag
    pub address_verified: bool,
}

/// Read-only store of the fixed demo profiles
#[derive(Clone, Copy, Debug, Default)]
pub struct ProfileStore;

impl ProfileStore {
    pub const fn new() -> Self {
        Self
    }

    /// Identifiers of all available profiles
    pub fn ids(&self) -> [&'static str; 4] {
        ["excellent", "good", "borderline", "rejected"]
    }

    /// Look up a profile by identifier
    pub fn get(&self, id: &str) -> Result<ApplicantProfile> {
        let profile = match id {
            "excellent" => ApplicantProfile {
                name: "Sarah Johnson".into(),
                credit_score: 780,
                income: dec!(120_000),
                employment_years: 8.0,
                existing_loans: 0,
                email: "sarah.johnson@email.com".into(),
                phone: "+1-555-0123".into(),
                employer_verified: true,
                address_verified: true,
            },
            "good" => ApplicantProfile {
                name: "Michael Chen".into(),
                credit_score: 720,
                income: dec!(85_000),
                employment_years: 4.0,
                existing_loans: 1,
                email: "michael.chen@email.com".into(),
                phone: "+1-555-0456".into(),
                employer_verified: true,
                address_verified: true,
            },
            "borderline" => ApplicantProfile {
                name: "Emily Rodriguez".into(),
                credit_score: 650,
                income: dec!(55_000),
                employment_years: 2.0,
                existing_loans: 2,
                email: "emily.r@email.com".into(),
                phone: "+1-555-0789".into(),
                employer_verified: true,
                address_verified: false,
            },
            "rejected" => ApplicantProfile {
                name: "James Wilson".into(),
                credit_score: 520,
                income: dec!(35_000),
                employment_years: 0.5,
                existing_loans: 4,
                email: "james.w@email.com".into(),
                phone: "+1-555-0321".into(),
                employer_verified: false,
                address_verified: false,
            },
            _ => return Err(AdvisorError::ProfileNotFound(id.to_string())),
        };

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_profiles_resolve() {
        let store = ProfileStore::new();
        for id in store.ids() {
            assert!(store.get(id).is_ok(), "profile {id} should exist");
        }
    }

    #[test]
    fn test_unknown_profile_fails() {
        let store = ProfileStore::new();
        let err = store.get("platinum").unwrap_err();
        assert!(matches!(err, AdvisorError::ProfileNotFound(id) if id == "platinum"));
    }

    #[test]
    fn test_rejected_profile_constants() {
        let profile = ProfileStore::new().get("rejected").unwrap();
        assert_eq!(profile.credit_score, 520);
        assert_eq!(profile.existing_loans, 4);
        assert!((profile.employment_years - 0.5).abs() < f64::EPSILON);
        assert!(!profile.employer_verified);
    }
}
