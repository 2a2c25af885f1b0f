//! Webhook types: outbound payload, errors, and the client trait.

use serde::Serialize;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by webhook client operations.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request could not be sent or the connection failed.
    #[error("webhook request failed: {0}")]
    Request(String),

    /// No complete response arrived within the fixed timeout.
    #[error("webhook request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The webhook answered with a non-success HTTP status.
    #[error("webhook response error: status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be read.
    #[error("webhook body read failed: {0}")]
    BodyRead(String),
}

// =============================================================================
// PAYLOAD
// =============================================================================

/// JSON body posted to the webhook: `{sessionId, action, chatInput}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub session_id: String,
    pub action: String,
    pub chat_input: String,
}

// =============================================================================
// WEBHOOK TRAIT
// =============================================================================

/// Async seam over the chat webhook. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ChatWebhook: Send + Sync {
    /// Post one chat message and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Status`] for a non-2xx answer, and a transport
    /// variant when the call fails or times out.
    async fn send(&self, payload: &WebhookPayload) -> Result<String, WebhookError>;

    /// Endpoint URL, for diagnostics only.
    fn endpoint(&self) -> &str;
}
