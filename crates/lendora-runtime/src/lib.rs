//! # lendora-runtime
//!
//! Gateway client for the hosted text-generation service.
//!
//! The gateway speaks the OpenAI-compatible chat-completions wire format:
//! JSON request with bearer auth, reply streamed as newline-delimited
//! `data: <json>` event records ending on a `[DONE]` sentinel. The
//! [`sse::EventBuffer`] owns the line-reassembly logic; [`GatewayProvider`]
//! wires it into the `CompletionProvider` seam.

pub mod gateway;
pub mod sse;

pub use gateway::{GatewayConfig, GatewayProvider};
pub use sse::EventBuffer;
