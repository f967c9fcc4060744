//! Session Analytics
//!
//! Pure observer of the conversation: records stage transitions, message
//! counts and the terminal outcome, and produces a session summary. It is
//! session-scoped state owned by the orchestrator — there is no
//! process-wide registry — and it never influences conversation
//! correctness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lendora_core::{SessionId, Stage};

/// Terminal outcome of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOutcome {
    Approved,
    Rejected,
    Abandoned,
}

/// Summary of a single demo session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionAnalytics {
    /// Session identifier
    pub session_id: SessionId,

    /// Selected mock profile, once a session starts
    pub profile_id: Option<String>,

    /// When the profile was selected
    pub start_time: Option<DateTime<Utc>>,

    /// When a terminal outcome was recorded
    pub end_time: Option<DateTime<Utc>>,

    /// Count of user and assistant messages exchanged
    pub total_messages: u32,

    /// Stages visited, in first-visit order
    pub stages_visited: Vec<Stage>,

    /// Whether the session reached a non-abandoned outcome
    pub completed: bool,

    /// Terminal outcome, once recorded
    pub outcome: Option<SessionOutcome>,

    /// Wall-clock duration in seconds, once ended
    pub duration_seconds: Option<i64>,
}

impl SessionAnalytics {
    fn empty() -> Self {
        Self {
            session_id: SessionId::new(),
            profile_id: None,
            start_time: None,
            end_time: None,
            total_messages: 0,
            stages_visited: Vec::new(),
            completed: false,
            outcome: None,
            duration_seconds: None,
        }
    }
}

/// Records analytics for one session at a time
#[derive(Clone, Debug)]
pub struct AnalyticsRecorder {
    analytics: SessionAnalytics,
}

impl Default for AnalyticsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsRecorder {
    pub fn new() -> Self {
        Self {
            analytics: SessionAnalytics::empty(),
        }
    }

    /// Current snapshot
    pub fn analytics(&self) -> &SessionAnalytics {
        &self.analytics
    }

    /// Whether a terminal outcome has been recorded
    pub fn is_finalized(&self) -> bool {
        self.analytics.outcome.is_some()
    }

    /// Begin tracking a new session for the given profile
    pub fn start_session(&mut self, profile_id: &str) {
        self.analytics = SessionAnalytics {
            session_id: SessionId::new(),
            profile_id: Some(profile_id.to_string()),
            start_time: Some(Utc::now()),
            stages_visited: vec![Stage::Greeting],
            ..SessionAnalytics::empty()
        };

        tracing::info!(
            session_id = %self.analytics.session_id,
            profile_id,
            "analytics session started"
        );
    }

    /// Record a stage visit. Idempotent: revisits are no-ops.
    pub fn record_stage_visit(&mut self, stage: Stage) {
        if self.analytics.stages_visited.contains(&stage) {
            return;
        }
        self.analytics.stages_visited.push(stage);
        tracing::info!(stage = %stage, "stage transition");
    }

    /// Record one exchanged message
    pub fn record_message(&mut self) {
        self.analytics.total_messages += 1;
    }

    /// Finalize the session. Last write wins when called twice.
    pub fn end_session(&mut self, outcome: SessionOutcome) {
        let now = Utc::now();
        self.analytics.end_time = Some(now);
        self.analytics.duration_seconds = self
            .analytics
            .start_time
            .map(|start| (now - start).num_seconds());
        self.analytics.completed = outcome != SessionOutcome::Abandoned;
        self.analytics.outcome = Some(outcome);

        tracing::info!(
            session_id = %self.analytics.session_id,
            outcome = ?outcome,
            duration_seconds = ?self.analytics.duration_seconds,
            total_messages = self.analytics.total_messages,
            "analytics session ended"
        );
    }

    /// Elapsed time since session start, formatted `m:ss`
    pub fn elapsed(&self) -> String {
        let Some(start) = self.analytics.start_time else {
            return "0:00".into();
        };
        let secs = (Utc::now() - start).num_seconds().max(0);
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    /// Reset to an untracked state
    pub fn reset(&mut self) {
        self.analytics = SessionAnalytics::empty();
    }
}
