//! # loan-advisor
//!
//! The Lendora lending domain: mock applicant profiles, the staged
//! conversation orchestrator, keyword stage classification, underwriting
//! decision rules, session analytics and the sanction-letter export
//! payload.
//!
//! The orchestrator drives the demo loan journey through five stages
//! (GREETING → SALES → VERIFICATION → UNDERWRITING → SANCTION), delegating
//! text generation to a `CompletionProvider` and deriving stage
//! transitions from the generated replies.

pub mod analytics;
pub mod classify;
pub mod error;
pub mod orchestrator;
pub mod profiles;
pub mod prompts;
pub mod sanction;
pub mod underwrite;

pub use analytics::{AnalyticsRecorder, SessionAnalytics, SessionOutcome};
pub use classify::classify_stage;
pub use error::{AdvisorError, Result};
pub use orchestrator::{LoanOrchestrator, OrchestratorConfig, SendOutcome};
pub use profiles::{ApplicantProfile, ProfileStore};
pub use sanction::SanctionLetterData;
pub use underwrite::{Decision, evaluate};
