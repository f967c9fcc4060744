//! # lendora-core
//!
//! Conversation primitives for the Lendora demo loan agent.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    LoanOrchestrator                          │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ Conversation │  │    Stage     │  │ CompletionProvider│  │
//! │  │   history    │──│   machine    │──│    (Strategy)     │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `CompletionProvider` trait is the seam to the hosted generation
//! gateway; everything above it is provider-agnostic.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod stage;

pub use error::{ChatError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{CompletionProvider, GatewayRequest, LoanDetails, ReplyStream, StreamDelta};
pub use session::SessionId;
pub use stage::Stage;
