//! Generation Gateway Provider
//!
//! Implementation of `CompletionProvider` against the hosted
//! OpenAI-compatible chat-completions gateway.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::Serialize;

use lendora_core::{
    error::{ChatError, Result},
    message::Message,
    provider::{CompletionProvider, GatewayRequest, LoanDetails, ReplyStream, StreamDelta},
    stage::Stage,
};

use crate::sse::EventBuffer;

/// Gateway provider configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Chat-completions endpoint URL
    pub endpoint: String,

    /// Bearer credential for the gateway
    pub api_key: String,

    /// Model identifier requested from the gateway
    pub model: String,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl GatewayConfig {
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://ai.gateway.lovable.dev/v1/chat/completions";
    pub const DEFAULT_MODEL: &'static str = "google/gemini-2.5-flash";

    /// Read configuration from the environment.
    ///
    /// `LENDORA_GATEWAY_KEY` is required; `LENDORA_GATEWAY_URL` and
    /// `LENDORA_GATEWAY_MODEL` fall back to the hosted defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LENDORA_GATEWAY_KEY")
            .map_err(|_| ChatError::Config("LENDORA_GATEWAY_KEY is not configured".into()))?;
        let endpoint = std::env::var("LENDORA_GATEWAY_URL")
            .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.into());
        let model = std::env::var("LENDORA_GATEWAY_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_MODEL.into());

        Ok(Self {
            endpoint,
            api_key,
            model,
            connect_timeout_secs: 30,
        })
    }
}

/// Outbound wire body for the gateway
#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    stage: Stage,
    #[serde(rename = "profileType", skip_serializing_if = "Option::is_none")]
    profile_type: Option<&'a str>,
    #[serde(rename = "loanDetails", skip_serializing_if = "Option::is_none")]
    loan_details: Option<&'a LoanDetails>,
}

/// Provider backed by the hosted generation gateway
pub struct GatewayProvider {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl GatewayProvider {
    /// Create from configuration
    pub fn from_config(config: GatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(GatewayConfig::from_env()?))
    }

    /// Map a non-success gateway status onto the error taxonomy
    async fn status_error(status: StatusCode, response: reqwest::Response) -> ChatError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => ChatError::RateLimited,
            StatusCode::PAYMENT_REQUIRED => ChatError::QuotaExhausted,
            _ => {
                let message = response.text().await.unwrap_or_default();
                tracing::error!(status = status.as_u16(), %message, "gateway error");
                ChatError::Upstream {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

#[async_trait]
impl CompletionProvider for GatewayProvider {
    async fn health_check(&self) -> Result<bool> {
        // The hosted gateway exposes no health endpoint; configuration
        // completeness is the best available signal.
        Ok(!self.config.api_key.is_empty() && !self.config.endpoint.is_empty())
    }

    async fn complete_stream(&self, request: &GatewayRequest) -> Result<ReplyStream> {
        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: &request.messages,
            stream: true,
            stage: request.stage,
            profile_type: request.profile_type.as_deref(),
            loan_details: request.loan_details.as_ref(),
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Stream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|b| b.to_vec()).map_err(|e| ChatError::Stream(e.to_string())));

        let state = StreamState {
            inner: Box::pin(bytes),
            events: EventBuffer::new(),
            pending: VecDeque::new(),
            finished: false,
        };

        let stream = futures::stream::unfold(state, |mut state| async move {
            loop {
                if let Some(delta) = state.pending.pop_front() {
                    return Some((Ok(StreamDelta::text(delta)), state));
                }
                if state.finished {
                    return None;
                }
                if state.events.is_done() {
                    state.finished = true;
                    return Some((Ok(StreamDelta::done()), state));
                }

                match state.inner.next().await {
                    Some(Ok(chunk)) => {
                        state.pending.extend(state.events.push_chunk(&chunk));
                    }
                    Some(Err(e)) => {
                        state.finished = true;
                        return Some((Err(e), state));
                    }
                    None => {
                        // Natural stream close counts as completion even
                        // without an explicit [DONE] sentinel.
                        state.finished = true;
                        return Some((Ok(StreamDelta::done()), state));
                    }
                }
            }
        });

        Ok(Box::pin(stream))
    }
}

struct StreamState {
    inner: std::pin::Pin<Box<dyn futures::Stream<Item = Result<Vec<u8>>> + Send>>,
    events: EventBuffer,
    pending: VecDeque<String>,
    finished: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig {
            endpoint: GatewayConfig::DEFAULT_ENDPOINT.into(),
            api_key: "test-key".into(),
            model: GatewayConfig::DEFAULT_MODEL.into(),
            connect_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_health_check_reflects_configuration() {
        let provider = GatewayProvider::from_config(config());
        assert!(provider.health_check().await.unwrap());

        let mut unconfigured = config();
        unconfigured.api_key = String::new();
        let provider = GatewayProvider::from_config(unconfigured);
        assert!(!provider.health_check().await.unwrap());
    }

    #[test]
    fn test_wire_body_shape() {
        let messages = vec![Message::user("Hello")];
        let details = LoanDetails::default();
        let body = ChatCompletionBody {
            model: "google/gemini-2.5-flash",
            messages: &messages,
            stream: true,
            stage: Stage::Sales,
            profile_type: Some("excellent"),
            loan_details: Some(&details),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stage"], "SALES");
        assert_eq!(json["profileType"], "excellent");
        assert_eq!(json["loanDetails"]["term"], 36);
        assert_eq!(json["stream"], true);
    }
}
