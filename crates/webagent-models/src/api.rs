//! JSON bodies exchanged with the backend.
//!
//! | Endpoint | Request | Response |
//! |----------|---------|----------|
//! | `GET /health` | — | [`HealthResponse`] |
//! | `POST /ask` | [`AskRequest`] | [`AskResponse`] |
//! | `POST /send-email` | [`SendEmailRequest`] | [`MessageResponse`] |
//! | `POST /fetch-emails` | — | [`MessageResponse`] |

use serde::{Deserialize, Serialize};

/// Body of `POST /ask`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AskRequest {
    /// The user's query, already trimmed.
    pub query: String,
}

/// Response of `POST /ask`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AskResponse {
    /// Which engine answered (e.g. `"Local LLM (Phi-3 via Ollama)"`).
    pub mode: String,
    /// Backend classification of the query (`ecommerce`, `scraper`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Ordered plan steps, when the backend produced one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Vec<String>>,
    /// The final answer text.
    pub answer: String,
}

/// Body of `POST /send-email`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SendEmailRequest {
    /// Destination address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Response of `POST /send-email` and `POST /fetch-emails`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable outcome, rendered verbatim.
    pub message: String,
}

/// Response of `GET /health`.
///
/// Only the status code matters to the popup; the body is informational.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    /// Free-form status string.
    #[serde(rename = "Status")]
    pub status: String,
}
