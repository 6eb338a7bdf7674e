//! Portfolio chat responder.
//!
//! Every message goes through three stages:
//!
//! ```text
//! message ──> injection guard ──(match)──> fixed refusal
//!                  │
//!                  v
//!          upstream configured? ──(ok)──> model reply
//!                  │ no / error
//!                  v
//!          keyword fallback ──> canned topic answer
//! ```
//!
//! Upstream failures are logged and never surfaced to the caller.

mod knowledge;
mod upstream;

use std::sync::Arc;

use serde::Serialize;

use crate::security::match_injection;

pub use knowledge::{
    fallback_response, match_topic, Topic, DEFAULT_RESPONSE, EMPTY_UPSTREAM_RESPONSE,
    PORTFOLIO_KNOWLEDGE, REFUSAL_RESPONSE, SYSTEM_PROMPT,
};
pub use upstream::{
    InferenceBackend, UpstreamClient, UpstreamConfig, DEFAULT_MODEL, DEFAULT_UPSTREAM_URL,
};

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Injection guard refusal
    Refusal,
    /// Inference API
    Upstream,
    /// Keyword table
    Fallback,
}

/// A chat reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    /// Reply text
    pub response: String,
    /// Producer of the reply
    pub source: ReplySource,
}

impl ChatReply {
    fn fallback(message: &str) -> Self {
        Self {
            response: fallback_response(message).to_string(),
            source: ReplySource::Fallback,
        }
    }
}

/// Guarded chat responder
#[derive(Clone, Default)]
pub struct ChatService {
    backend: Option<Arc<dyn InferenceBackend>>,
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("backend", &self.backend_name())
            .finish()
    }
}

impl ChatService {
    /// Responder using only the keyword table
    pub fn fallback_only() -> Self {
        Self { backend: None }
    }

    /// Responder backed by an inference backend
    pub fn with_backend(backend: Arc<dyn InferenceBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Build from optional upstream configuration.
    ///
    /// A client that fails to build degrades to the keyword table.
    pub fn from_config(config: Option<UpstreamConfig>) -> Self {
        match config.map(UpstreamClient::new) {
            Some(Ok(client)) => {
                tracing::info!("Chat upstream: {} ({})", client.model(), client.base_url());
                Self::with_backend(Arc::new(client))
            },
            Some(Err(e)) => {
                tracing::warn!("Chat upstream unavailable, using keyword fallback: {}", e);
                Self::fallback_only()
            },
            None => Self::fallback_only(),
        }
    }

    /// Name of the active backend
    pub fn backend_name(&self) -> &'static str {
        self.backend.as_ref().map_or("fallback", |b| b.name())
    }

    /// Answer a message.
    pub async fn respond(&self, message: &str) -> ChatReply {
        if let Some(pattern) = match_injection(message) {
            tracing::warn!(pattern = pattern.name, "prompt injection attempt refused");
            return ChatReply {
                response: REFUSAL_RESPONSE.to_string(),
                source: ReplySource::Refusal,
            };
        }

        if let Some(backend) = &self.backend {
            match backend.complete(message).await {
                Ok(response) => {
                    return ChatReply {
                        response,
                        source: ReplySource::Upstream,
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        backend = backend.name(),
                        "Inference API error, falling back to knowledge base: {}",
                        e
                    );
                },
            }
        }

        ChatReply::fallback(message)
    }
}
