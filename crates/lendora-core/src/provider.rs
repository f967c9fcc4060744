//! Generation Provider Strategy Pattern
//!
//! Defines the interface between the conversation orchestrator and the
//! hosted text-generation gateway. The orchestrator works exclusively
//! through this trait, so the gateway implementation (or a scripted mock
//! in tests) can be swapped without touching conversation logic.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::stage::Stage;

/// Requested loan terms, set once at session start
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoanDetails {
    /// Principal amount in USD
    pub amount: f64,

    /// Term in months
    pub term: u32,

    /// Stated purpose (e.g. "Personal")
    pub purpose: String,
}

impl Default for LoanDetails {
    fn default() -> Self {
        Self {
            amount: 25_000.0,
            term: 36,
            purpose: "Personal".into(),
        }
    }
}

/// Outbound request to the generation gateway
///
/// Mirrors the wire body: full message history plus the conversational
/// context the gateway uses to steer the reply.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayRequest {
    /// Full conversation history, system prompt first
    pub messages: Vec<Message>,

    /// Current conversation stage
    pub stage: Stage,

    /// Selected mock profile identifier, if a demo profile is active
    #[serde(rename = "profileType")]
    pub profile_type: Option<String>,

    /// Requested loan terms
    #[serde(rename = "loanDetails")]
    pub loan_details: Option<LoanDetails>,
}

/// An incremental text delta from a streaming reply
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StreamDelta {
    /// The text fragment
    pub delta: String,

    /// Whether this is the final chunk of the reply
    pub done: bool,
}

impl StreamDelta {
    pub fn text(delta: impl Into<String>) -> Self {
        Self {
            delta: delta.into(),
            done: false,
        }
    }

    pub fn done() -> Self {
        Self {
            delta: String::new(),
            done: true,
        }
    }
}

/// Stream type for reply streaming
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<StreamDelta>> + Send>>;

/// Strategy trait for generation providers
///
/// Implement this trait to add support for a new generation backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Check if the provider is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Issue a streaming generation request
    ///
    /// The returned stream yields text deltas in order; the final item has
    /// `done == true`. Errors before the first delta indicate the request
    /// itself failed; errors mid-stream abort the reply.
    async fn complete_stream(&self, request: &GatewayRequest) -> Result<ReplyStream>;
}
