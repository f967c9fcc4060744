//! Stage Classification
//!
//! Maps generated reply text onto a conversation stage by keyword
//! sniffing. This is a heuristic, not a verified state machine: it can
//! jump or revisit stages on false positives. The keyword lists and their
//! priority order are the behavioral contract and must not be reordered —
//! when a text matches several sets, the first set tested wins.

use lendora_core::Stage;

/// Keyword sets in priority order. First match wins.
const STAGE_KEYWORDS: [(Stage, &[&str]); 4] = [
    (
        Stage::Verification,
        &["verify", "confirm your", "your information"],
    ),
    (
        Stage::Underwriting,
        &["evaluate", "assess", "credit", "eligibility"],
    ),
    (
        Stage::Sanction,
        &["approved", "rejected", "decision", "sanction"],
    ),
    (
        Stage::Sales,
        &["loan amount", "interest", "how much", "borrow"],
    ),
];

/// Classify the latest assistant text.
///
/// Returns `None` when no keyword set matches; the caller keeps the
/// current stage in that case.
pub fn classify_stage(text: &str) -> Option<Stage> {
    let lower = text.to_lowercase();

    STAGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(stage, _)| *stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_keeps_current_stage() {
        assert_eq!(classify_stage("Hello! Welcome to Lendora."), None);
    }

    #[test]
    fn test_each_stage_matches() {
        assert_eq!(
            classify_stage("Let me verify your employment status."),
            Some(Stage::Verification)
        );
        assert_eq!(
            classify_stage("I will now assess your application."),
            Some(Stage::Underwriting)
        );
        assert_eq!(
            classify_stage("Congratulations, you are APPROVED!"),
            Some(Stage::Sanction)
        );
        assert_eq!(
            classify_stage("How much would you like to borrow?"),
            Some(Stage::Sales)
        );
    }

    #[test]
    fn test_verification_beats_sales() {
        // Both a verification and a sales keyword are present; the
        // priority tie-break must pick verification.
        let text = "I need to confirm your details before we discuss the loan amount.";
        assert_eq!(classify_stage(text), Some(Stage::Verification));
    }

    #[test]
    fn test_underwriting_beats_sanction() {
        let text = "We evaluate your credit before a decision is made.";
        assert_eq!(classify_stage(text), Some(Stage::Underwriting));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify_stage("YOUR INFORMATION is needed"),
            Some(Stage::Verification)
        );
    }
}
