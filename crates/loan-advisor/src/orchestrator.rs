//! Conversation Orchestrator
//!
//! Owns one session's message history, current stage, selected profile and
//! analytics. Each send assembles the stage-specific instruction block,
//! streams the reply from the generation provider, and runs the stage
//! classifier and underwriting evaluator as side effects of the reply.
//!
//! One generation request is outstanding at a time per session: every
//! send takes `&mut self` for the whole streamed reply, so a reset cannot
//! interleave with an in-flight stream. The `in_flight` flag only covers
//! a send future that was dropped mid-stream; a reset clears it.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;

use lendora_core::{
    error::{ChatError, Result as ChatResult},
    message::{Conversation, Message},
    provider::{CompletionProvider, GatewayRequest, LoanDetails},
    stage::Stage,
};

use crate::analytics::{AnalyticsRecorder, SessionAnalytics, SessionOutcome};
use crate::classify::classify_stage;
use crate::error::{AdvisorError, Result};
use crate::profiles::{ApplicantProfile, ProfileStore};
use crate::prompts::build_system_prompt;
use crate::sanction::SanctionLetterData;
use crate::underwrite::{Decision, evaluate};

/// Scripted user-style message that bootstraps the assistant's greeting
const BOOTSTRAP_MESSAGE: &str = "Hello, I'm interested in getting a personal loan.";

/// Orchestrator tunables
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Upper bound on one reply's streaming duration
    pub stream_deadline: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            stream_deadline: Duration::from_secs(120),
        }
    }
}

/// Result of one completed send
#[derive(Clone, Debug)]
pub struct SendOutcome {
    /// Full assistant reply text
    pub reply: String,

    /// Stage after classification of the reply
    pub stage: Stage,

    /// Whether this reply caused a stage transition
    pub stage_changed: bool,

    /// Underwriting decision, present once the sanction stage is reached
    pub decision: Option<Decision>,
}

/// Drives one demo loan conversation
pub struct LoanOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    profiles: ProfileStore,
    config: OrchestratorConfig,
    conversation: Conversation,
    stage: Stage,
    profile_id: Option<String>,
    profile: Option<ApplicantProfile>,
    loan: LoanDetails,
    recorder: AnalyticsRecorder,
    decision: Option<Decision>,
    in_flight: bool,
}

impl LoanOrchestrator {
    /// Create a new orchestrator with no active session
    pub fn new(provider: Arc<dyn CompletionProvider>, config: OrchestratorConfig) -> Self {
        Self {
            provider,
            profiles: ProfileStore::new(),
            config,
            conversation: Conversation::new(),
            stage: Stage::Greeting,
            profile_id: None,
            profile: None,
            loan: LoanDetails::default(),
            recorder: AnalyticsRecorder::new(),
            decision: None,
            in_flight: false,
        }
    }

    /// Message history
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Current conversation stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Analytics snapshot
    pub fn analytics(&self) -> &SessionAnalytics {
        self.recorder.analytics()
    }

    /// Underwriting decision, once the sanction stage has been reached
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Elapsed session time, formatted `m:ss`
    pub fn elapsed(&self) -> String {
        self.recorder.elapsed()
    }

    /// Assemble the sanction-letter export payload
    pub fn sanction_letter(&self) -> Result<SanctionLetterData> {
        let decision = self.decision.as_ref().ok_or(AdvisorError::NoDecision)?;
        let profile = self.profile.as_ref().ok_or(AdvisorError::NoActiveSession)?;
        Ok(SanctionLetterData::assemble(profile, &self.loan, decision))
    }

    /// Start a session for the given mock profile.
    ///
    /// Resolves the profile (unknown ids abort session creation), resets
    /// history, and sends the scripted bootstrap message so the assistant
    /// opens with a greeting.
    pub async fn start_session(
        &mut self,
        profile_id: &str,
        loan: Option<LoanDetails>,
    ) -> Result<SendOutcome> {
        let profile = self.profiles.get(profile_id)?;

        self.conversation.clear();
        self.stage = Stage::Greeting;
        self.profile_id = Some(profile_id.to_string());
        self.profile = Some(profile);
        self.loan = loan.unwrap_or_default();
        self.decision = None;
        self.in_flight = false;
        self.recorder.start_session(profile_id);

        self.send_message(BOOTSTRAP_MESSAGE).await
    }

    /// Send a user message and stream the assistant's reply
    pub async fn send_message(&mut self, text: &str) -> Result<SendOutcome> {
        self.send_with_sink(text, None).await
    }

    /// Send a user message, forwarding each reply delta to `sink` as it
    /// arrives (for server-side relay to the browser)
    pub async fn send_message_streaming(
        &mut self,
        text: &str,
        sink: mpsc::UnboundedSender<String>,
    ) -> Result<SendOutcome> {
        self.send_with_sink(text, Some(sink)).await
    }

    async fn send_with_sink(
        &mut self,
        text: &str,
        sink: Option<mpsc::UnboundedSender<String>>,
    ) -> Result<SendOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage.into());
        }
        if self.in_flight {
            return Err(ChatError::RequestInFlight.into());
        }
        if self.profile.is_none() {
            return Err(AdvisorError::NoActiveSession);
        }

        self.conversation.push(Message::user(text));
        self.recorder.record_message();

        self.in_flight = true;
        let streamed = self.stream_reply(sink).await;
        self.in_flight = false;
        let reply = streamed?;

        self.recorder.record_message();

        let stage_changed = match classify_stage(&reply) {
            Some(new_stage) if new_stage != self.stage => {
                tracing::debug!(from = %self.stage, to = %new_stage, "stage transition");
                self.stage = new_stage;
                self.recorder.record_stage_visit(new_stage);
                true
            }
            _ => false,
        };

        if self.stage.is_terminal() && self.decision.is_none() {
            if let Some(profile) = &self.profile {
                let decision = evaluate(profile, &self.loan);
                let outcome = if decision.approved {
                    SessionOutcome::Approved
                } else {
                    SessionOutcome::Rejected
                };
                self.recorder.end_session(outcome);
                self.decision = Some(decision);
            }
        }

        Ok(SendOutcome {
            reply,
            stage: self.stage,
            stage_changed,
            decision: self.decision.clone(),
        })
    }

    async fn stream_reply(&mut self, sink: Option<mpsc::UnboundedSender<String>>) -> ChatResult<String> {
        let system_prompt =
            build_system_prompt(self.stage, self.profile.as_ref(), Some(&self.loan));

        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.push(Message::system(system_prompt));
        messages.extend(self.conversation.messages().iter().cloned());

        let request = GatewayRequest {
            messages,
            stage: self.stage,
            profile_type: self.profile_id.clone(),
            loan_details: Some(self.loan.clone()),
        };

        let consume = async {
            let mut stream = self.provider.complete_stream(&request).await?;
            let mut reply = String::new();

            while let Some(item) = stream.next().await {
                let chunk = item?;
                if !chunk.delta.is_empty() {
                    reply.push_str(&chunk.delta);
                    self.conversation.append_delta(&chunk.delta);
                    if let Some(sink) = &sink {
                        // A dropped receiver just means nobody is relaying.
                        let _ = sink.send(chunk.delta.clone());
                    }
                }
                if chunk.done {
                    break;
                }
            }

            Ok(reply)
        };

        tokio::time::timeout(self.config.stream_deadline, consume)
            .await
            .map_err(|_| ChatError::UpstreamTimeout)?
    }

    /// Reset the session.
    ///
    /// Marks the analytics outcome as abandoned when no terminal outcome
    /// was recorded, clears all conversation state, and clears the
    /// in-flight flag left behind by a send future dropped mid-stream.
    pub fn reset_session(&mut self) {
        if self.recorder.analytics().start_time.is_some() && !self.recorder.is_finalized() {
            self.recorder.end_session(SessionOutcome::Abandoned);
        }

        self.conversation.clear();
        self.stage = Stage::Greeting;
        self.profile_id = None;
        self.profile = None;
        self.loan = LoanDetails::default();
        self.decision = None;
        self.in_flight = false;
    }
}
