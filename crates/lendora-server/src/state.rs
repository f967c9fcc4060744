//! Application State

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use lendora_core::provider::CompletionProvider;
use loan_advisor::{LoanOrchestrator, OrchestratorConfig};

/// Per-session orchestrator handle.
///
/// The mutex doubles as the at-most-one-in-flight guard: a send holds it
/// for the whole streamed reply, so a concurrent send observes it locked
/// and is rejected.
pub type SessionHandle = Arc<Mutex<LoanOrchestrator>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Generation gateway provider
    pub provider: Arc<dyn CompletionProvider>,

    /// Active demo sessions
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,

    /// Orchestrator tunables applied to new sessions
    pub orchestrator_config: OrchestratorConfig,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            orchestrator_config: OrchestratorConfig::default(),
        }
    }
}
