//! Conversation Stages
//!
//! The loan journey moves through five scripted phases, each handled by a
//! different worker-agent persona. The intended flow is linear
//! (GREETING → SALES → VERIFICATION → UNDERWRITING → SANCTION) but the
//! classifier that drives transitions is keyword-based and may jump or
//! revisit stages.

use serde::{Deserialize, Serialize};

/// Discrete phase of the loan conversation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Welcome the user, introduce the platform
    Greeting,
    /// Discuss loan products, amounts, terms
    Sales,
    /// Collect and verify applicant information
    Verification,
    /// Evaluate eligibility and credit assessment
    Underwriting,
    /// Deliver the approval/rejection decision
    Sanction,
}

impl Stage {
    /// All stages in intended conversational order
    pub const ALL: [Stage; 5] = [
        Stage::Greeting,
        Stage::Sales,
        Stage::Verification,
        Stage::Underwriting,
        Stage::Sanction,
    ];

    /// Wire/display name (matches the serialized form)
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Greeting => "GREETING",
            Stage::Sales => "SALES",
            Stage::Verification => "VERIFICATION",
            Stage::Underwriting => "UNDERWRITING",
            Stage::Sanction => "SANCTION",
        }
    }

    /// Whether this is the conversational end of the journey
    pub fn is_terminal(self) -> bool {
        self == Stage::Sanction
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Greeting
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Stage::Underwriting).unwrap();
        assert_eq!(json, "\"UNDERWRITING\"");

        let stage: Stage = serde_json::from_str("\"SANCTION\"").unwrap();
        assert_eq!(stage, Stage::Sanction);
    }

    #[test]
    fn test_ordering() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::Greeting));
        assert_eq!(Stage::ALL.last(), Some(&Stage::Sanction));
        assert!(Stage::Sanction.is_terminal());
        assert!(!Stage::Greeting.is_terminal());
    }
}
