//! HTTP Handlers
//!
//! REST endpoints for the demo loan journey. Replies are relayed to the
//! browser as an SSE event stream using the same `data:` framing the
//! generation gateway produces, ending with a `[DONE]` sentinel.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use lendora_core::{ChatError, Stage, provider::LoanDetails};
use loan_advisor::{
    AdvisorError, Decision, LoanOrchestrator, ProfileStore, SanctionLetterData, SessionAnalytics,
};

use crate::state::{AppState, SessionHandle};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway_connected: bool,
}

#[derive(Serialize)]
pub struct ProfileSummary {
    pub id: &'static str,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub profile_id: String,
    #[serde(default)]
    pub loan: Option<LoanDetails>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub stage: Stage,
    pub greeting: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: Uuid,
    pub analytics: SessionAnalytics,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a domain error onto an HTTP status, error code and user message
fn error_response(err: &AdvisorError) -> ApiError {
    let (status, code) = match err {
        AdvisorError::ProfileNotFound(_) => (StatusCode::NOT_FOUND, "PROFILE_NOT_FOUND"),
        AdvisorError::NoDecision => (StatusCode::CONFLICT, "NO_DECISION"),
        AdvisorError::NoActiveSession => (StatusCode::CONFLICT, "NO_ACTIVE_SESSION"),
        AdvisorError::Chat(chat) => match chat {
            ChatError::EmptyMessage => (StatusCode::BAD_REQUEST, "EMPTY_MESSAGE"),
            ChatError::RequestInFlight => (StatusCode::CONFLICT, "REQUEST_IN_FLIGHT"),
            ChatError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            ChatError::QuotaExhausted => (StatusCode::PAYMENT_REQUIRED, "QUOTA_EXHAUSTED"),
            ChatError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            ChatError::Upstream { .. } | ChatError::Stream(_) => {
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            ChatError::Config(_) | ChatError::Json(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        },
        AdvisorError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    };

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code,
        }),
    )
}

fn session_not_found(id: Uuid) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {id} does not exist."),
            code: "SESSION_NOT_FOUND",
        }),
    )
}

async fn session_handle(state: &AppState, id: Uuid) -> Result<SessionHandle, ApiError> {
    state
        .sessions
        .read()
        .await
        .get(&id)
        .cloned()
        .ok_or_else(|| session_not_found(id))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let gateway_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway_connected,
    })
}

/// List the available demo profiles
pub async fn list_profiles() -> Json<Vec<ProfileSummary>> {
    let store = ProfileStore::new();
    let profiles = store
        .ids()
        .into_iter()
        .filter_map(|id| store.get(id).ok().map(|p| ProfileSummary { id, name: p.name }))
        .collect();

    Json(profiles)
}

/// Start a new demo session for a profile
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let mut orchestrator =
        LoanOrchestrator::new(state.provider.clone(), state.orchestrator_config.clone());

    let outcome = orchestrator
        .start_session(&payload.profile_id, payload.loan)
        .await
        .map_err(|e| {
            tracing::warn!(profile_id = %payload.profile_id, error = %e, "session start failed");
            error_response(&e)
        })?;

    let session_id = Uuid::new_v4();
    state
        .sessions
        .write()
        .await
        .insert(session_id, Arc::new(Mutex::new(orchestrator)));

    tracing::info!(%session_id, profile_id = %payload.profile_id, "session created");

    Ok(Json(CreateSessionResponse {
        session_id,
        stage: outcome.stage,
        greeting: outcome.reply,
    }))
}

/// Event relayed to the browser over SSE
enum RelayEvent {
    Delta(String),
    Completed {
        stage: Stage,
        stage_changed: bool,
        decision: Option<Decision>,
    },
    Error(ApiErrorBody),
    Done,
}

struct ApiErrorBody {
    error: String,
    code: &'static str,
}

fn relay_to_sse(event: RelayEvent) -> Event {
    match event {
        RelayEvent::Delta(delta) => Event::default().data(
            serde_json::json!({"choices": [{"delta": {"content": delta}}]}).to_string(),
        ),
        RelayEvent::Completed {
            stage,
            stage_changed,
            decision,
        } => Event::default().data(
            serde_json::json!({
                "type": "completed",
                "stage": stage,
                "stageChanged": stage_changed,
                "decision": decision,
            })
            .to_string(),
        ),
        RelayEvent::Error(body) => Event::default().data(
            serde_json::json!({"type": "error", "error": body.error, "code": body.code})
                .to_string(),
        ),
        RelayEvent::Done => Event::default().data("[DONE]"),
    }
}

/// Send a user message; the reply streams back as SSE
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let text = payload.message.trim().to_string();
    if text.is_empty() {
        return Err(error_response(&ChatError::EmptyMessage.into()));
    }

    let handle = session_handle(&state, id).await?;

    // Holding the guard for the whole reply enforces at most one
    // in-flight generation per session.
    let Ok(mut guard) = handle.try_lock_owned() else {
        return Err(error_response(&ChatError::RequestInFlight.into()));
    };

    let (event_tx, event_rx) = mpsc::unbounded_channel::<RelayEvent>();
    let (delta_tx, mut delta_rx) = mpsc::unbounded_channel::<String>();

    let forwarder_tx = event_tx.clone();
    tokio::spawn(async move {
        while let Some(delta) = delta_rx.recv().await {
            if forwarder_tx.send(RelayEvent::Delta(delta)).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let result = guard.send_message_streaming(&text, delta_tx).await;
        match result {
            Ok(outcome) => {
                let _ = event_tx.send(RelayEvent::Completed {
                    stage: outcome.stage,
                    stage_changed: outcome.stage_changed,
                    decision: outcome.decision,
                });
            }
            Err(e) => {
                tracing::warn!(session_id = %id, error = %e, "send failed");
                let (_, Json(body)) = error_response(&e);
                let _ = event_tx.send(RelayEvent::Error(ApiErrorBody {
                    error: body.error,
                    code: body.code,
                }));
            }
        }
        let _ = event_tx.send(RelayEvent::Done);
    });

    let stream =
        UnboundedReceiverStream::new(event_rx).map(|event| Ok(relay_to_sse(event)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Reset a session; a session with no terminal outcome becomes abandoned
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResetResponse>, ApiError> {
    let handle = session_handle(&state, id).await?;
    let mut orchestrator = handle.lock().await;
    orchestrator.reset_session();

    Ok(Json(ResetResponse {
        session_id: id,
        analytics: orchestrator.analytics().clone(),
    }))
}

/// Session analytics summary
pub async fn session_analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionAnalytics>, ApiError> {
    let handle = session_handle(&state, id).await?;
    let orchestrator = handle.lock().await;
    Ok(Json(orchestrator.analytics().clone()))
}

/// Sanction-letter export payload; available once a decision exists
pub async fn sanction_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SanctionLetterData>, ApiError> {
    let handle = session_handle(&state, id).await?;
    let orchestrator = handle.lock().await;
    orchestrator
        .sanction_letter()
        .map(Json)
        .map_err(|e| error_response(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let (status, Json(body)) = error_response(&ChatError::RateLimited.into());
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body.code, "RATE_LIMITED");

        let (status, _) = error_response(&ChatError::QuotaExhausted.into());
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);

        let (status, _) = error_response(&AdvisorError::ProfileNotFound("x".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(&ChatError::RequestInFlight.into());
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn test_every_chat_error_maps_to_a_status() {
        // One assertion per upstream/validation variant so a new variant
        // without a mapping shows up here as well as at compile time.
        let cases = [
            (ChatError::EmptyMessage, StatusCode::BAD_REQUEST),
            (ChatError::RequestInFlight, StatusCode::CONFLICT),
            (ChatError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ChatError::QuotaExhausted, StatusCode::PAYMENT_REQUIRED),
            (ChatError::UpstreamTimeout, StatusCode::GATEWAY_TIMEOUT),
            (
                ChatError::Upstream {
                    status: 500,
                    message: "boom".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (ChatError::Stream("closed".into()), StatusCode::BAD_GATEWAY),
            (ChatError::Config("missing key".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, _) = error_response(&err.into());
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_delta_relay_uses_gateway_framing() {
        let event = relay_to_sse(RelayEvent::Delta("Hi".into()));
        // Event's Debug output contains the serialized payload.
        let debug = format!("{event:?}");
        assert!(debug.contains("choices"));
    }
}
