//! Agent Prompt Assembly
//!
//! The conversation is steered by a master-agent prompt plus a
//! stage-specific worker-agent prompt, enriched with the selected profile,
//! the requested loan and (at the sanction stage) the precomputed
//! decision. The assembled block is sent as the system message of every
//! generation request.

use lendora_core::Stage;
use lendora_core::provider::LoanDetails;

use crate::profiles::ApplicantProfile;
use crate::underwrite;

const MASTER_AGENT_PROMPT: &str = r#"You are the Master Agent for Lendora, an AI-powered lending platform. Your role is to orchestrate the loan application journey by coordinating with specialized Worker Agents.

You are warm, professional, and empathetic. You guide users through the loan process efficiently while being transparent about each step.

Current conversation stage determines which agent handles the response:
- GREETING: Welcome user, introduce Lendora, ask about loan needs
- SALES: Discuss loan options, amounts, terms, answer questions (Sales Agent)
- VERIFICATION: Collect and verify user information (Verification Agent)
- UNDERWRITING: Evaluate eligibility and credit assessment (Underwriting Agent)
- SANCTION: Generate approval/rejection decision (Sanction Letter Generator)

Always be emotion-aware:
- If user seems hesitant, provide reassurance
- If user is excited, match their enthusiasm professionally
- If user is frustrated, be understanding and helpful

CRITICAL FORMATTING RULES:
- NEVER use asterisks (*) for emphasis or bullet points
- Use plain text without markdown formatting
- Use dashes (-) for lists instead of asterisks
- Do not use bold (**) or italic (*) formatting

Response format: Be conversational and helpful. Keep responses concise but informative."#;

const SALES_AGENT_PROMPT: &str = r#"You are the Sales Agent for Lendora. You specialize in:
- Explaining loan products and terms
- Understanding customer needs
- Recommending appropriate loan amounts and terms
- Answering questions about interest rates, EMI, and repayment

Be enthusiastic but not pushy. Focus on finding the right solution for the customer.
Lendora offers personal loans from $5,000 to $100,000 with competitive rates starting at 8.99% APR.
Loan terms available: 12, 24, 36, 48, or 60 months."#;

const VERIFICATION_AGENT_PROMPT: &str = r#"You are the Verification Agent for Lendora. You handle:
- Collecting user information (name, email, phone)
- Verifying employment status
- Confirming address and identity
- CRM validation simulation

Be thorough but efficient. Explain why each piece of information is needed.
When verifying, simulate checking against our CRM system."#;

const UNDERWRITING_AGENT_PROMPT: &str = r#"You are the Underwriting Agent for Lendora. You evaluate:
- Credit score analysis
- Debt-to-income ratio
- Employment stability
- Risk assessment

Eligibility Rules:
- Minimum credit score: 580
- Maximum debt-to-income ratio: 43%
- Minimum employment: 6 months
- Maximum existing loans: 3

Provide clear, transparent explanations of your evaluation."#;

const SANCTION_AGENT_PROMPT: &str = r#"You are the Sanction Letter Generator for Lendora. You:
- Generate approval or rejection decisions
- Provide detailed explanations
- Create official sanction letter content
- Offer next steps and recommendations

For approvals: Include loan amount, interest rate, EMI, term, and conditions.
For rejections: Provide clear reasons and improvement suggestions."#;

/// Assemble the stage-specific system prompt.
pub fn build_system_prompt(
    stage: Stage,
    profile: Option<&ApplicantProfile>,
    loan: Option<&LoanDetails>,
) -> String {
    let mut prompt = format!("{MASTER_AGENT_PROMPT}\n\n");

    match stage {
        Stage::Sales => {
            prompt.push_str(&format!("Current Agent: Sales Agent\n{SALES_AGENT_PROMPT}"));
        }
        Stage::Verification => {
            prompt.push_str(&format!(
                "Current Agent: Verification Agent\n{VERIFICATION_AGENT_PROMPT}"
            ));
            if let Some(profile) = profile {
                prompt.push_str(&format!(
                    "\n\nUser Profile (from CRM):\n{}",
                    profile_json(profile)
                ));
            }
        }
        Stage::Underwriting => {
            prompt.push_str(&format!(
                "Current Agent: Underwriting Agent\n{UNDERWRITING_AGENT_PROMPT}"
            ));
            if let Some(profile) = profile {
                prompt.push_str(&format!(
                    "\n\nUser Profile for Assessment:\n{}",
                    profile_json(profile)
                ));
                if let Some(loan) = loan {
                    prompt.push_str(&format!(
                        "\n\nRequested Loan:\n{}",
                        serde_json::to_string_pretty(loan).unwrap_or_default()
                    ));
                }
            }
        }
        Stage::Sanction => {
            prompt.push_str(&format!(
                "Current Agent: Sanction Letter Generator\n{SANCTION_AGENT_PROMPT}"
            ));
            if let (Some(profile), Some(loan)) = (profile, loan) {
                let decision = underwrite::evaluate(profile, loan);

                prompt.push_str(&format!(
                    "\n\nDecision: {}",
                    if decision.approved { "APPROVED" } else { "REJECTED" }
                ));
                prompt.push_str(&format!("\nUser Profile:\n{}", profile_json(profile)));
                prompt.push_str(&format!(
                    "\nLoan Details:\n{}",
                    serde_json::to_string_pretty(loan).unwrap_or_default()
                ));
                if decision.approved {
                    prompt.push_str(&format!(
                        "\nApproved Interest Rate: {}% APR",
                        decision.interest_rate
                    ));
                    prompt.push_str(&format!("\nMonthly EMI: ${}", decision.monthly_installment));
                }
            }
        }
        Stage::Greeting => {
            prompt.push_str(
                "Current Stage: GREETING - Welcome the user warmly and introduce Lendora's loan services.",
            );
        }
    }

    prompt
}

fn profile_json(profile: &ApplicantProfile) -> String {
    serde_json::to_string_pretty(profile).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ProfileStore;

    #[test]
    fn test_greeting_prompt_has_no_profile_data() {
        let prompt = build_system_prompt(Stage::Greeting, None, None);
        assert!(prompt.contains("Master Agent"));
        assert!(prompt.contains("GREETING"));
        assert!(!prompt.contains("User Profile"));
    }

    #[test]
    fn test_verification_prompt_injects_profile() {
        let profile = ProfileStore::new().get("good").unwrap();
        let prompt = build_system_prompt(Stage::Verification, Some(&profile), None);
        assert!(prompt.contains("Verification Agent"));
        assert!(prompt.contains("Michael Chen"));
    }

    #[test]
    fn test_sanction_prompt_includes_decision() {
        let profile = ProfileStore::new().get("excellent").unwrap();
        let loan = LoanDetails::default();
        let prompt = build_system_prompt(Stage::Sanction, Some(&profile), Some(&loan));

        assert!(prompt.contains("Decision: APPROVED"));
        assert!(prompt.contains("Approved Interest Rate: 8.99% APR"));
        assert!(prompt.contains("Monthly EMI: $794.88"));
    }

    #[test]
    fn test_sanction_prompt_rejection_omits_pricing() {
        let profile = ProfileStore::new().get("rejected").unwrap();
        let loan = LoanDetails::default();
        let prompt = build_system_prompt(Stage::Sanction, Some(&profile), Some(&loan));

        assert!(prompt.contains("Decision: REJECTED"));
        assert!(!prompt.contains("Approved Interest Rate"));
    }
}
