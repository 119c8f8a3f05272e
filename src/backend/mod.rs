//! Model backend seam.
//!
//! Provides the [`ChatBackend`] trait the session talks to, the request and
//! message types it exchanges, and an Ollama HTTP implementation in [`ollama`].
//! Model selection ([`choose_model`]) is a pure function over the installed list.

pub mod ollama;

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

use crate::style::SamplingOptions;

/// Errors surfaced by a model backend. All are reported to the user; none are retried.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("cannot reach Ollama at {url}. Is Ollama running?")]
    Unreachable { url: String },

    #[error("Ollama HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("failed to decode Ollama response: {0}")]
    Decode(String),

    #[error("configured model '{model}' is not installed. Installed: {installed}")]
    ModelNotInstalled { model: String, installed: String },

    #[error("no Ollama models found. Run `ollama pull llama3.2` (or any model) and keep `ollama serve` running.")]
    NoModels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One model call: the system preamble is already the first message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: SamplingOptions,
}

/// Something that turns a message list into a reply.
pub trait ChatBackend {
    /// Send the full message list and return the trimmed reply text.
    fn chat(&self, request: &ChatRequest) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// Pick the model to talk to.
///
/// A configured model wins if it is installed, or if the installed list could not be
/// fetched. Otherwise the first installed `preferred` model, then the first installed
/// model at all.
pub fn choose_model(
    configured: Option<&str>,
    installed: &[String],
    preferred: &[String],
) -> Result<String, BackendError> {
    if let Some(model) = configured {
        if installed.is_empty() || installed.iter().any(|m| m == model) {
            return Ok(model.to_string());
        }
        return Err(BackendError::ModelNotInstalled {
            model: model.to_string(),
            installed: installed.join(", "),
        });
    }

    preferred
        .iter()
        .find(|candidate| installed.contains(*candidate))
        .or_else(|| installed.first())
        .cloned()
        .ok_or(BackendError::NoModels)
}
