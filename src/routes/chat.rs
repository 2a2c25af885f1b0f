//! Chat route: relay endpoint for the chat widget.
//!
//! ERROR HANDLING
//! ==============
//! Every failure reaches the caller as a fixed apology in `response`; the
//! diagnostic detail only goes to the log. The reply text is repeated under
//! `text`, `message` and `response` so clients reading any of them work.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::services::relay::{self, RelayError, RelayReply, RelayRequest};
use crate::state::AppState;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    pub timestamp: String,
    pub session_id: String,
    pub processed: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatSuccess {
    pub success: bool,
    pub text: String,
    pub message: String,
    pub response: String,
    pub metadata: ChatMetadata,
}

impl From<RelayReply> for ChatSuccess {
    fn from(reply: RelayReply) -> Self {
        Self {
            success: true,
            message: reply.text.clone(),
            response: reply.text.clone(),
            text: reply.text,
            metadata: ChatMetadata {
                timestamp: reply.timestamp,
                session_id: reply.session_id,
                processed: reply.processed,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatFailure {
    pub success: bool,
    pub error: String,
    /// User-facing apology; absent for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Success(ChatSuccess),
    Failure(ChatFailure),
}

// =============================================================================
// HANDLER
// =============================================================================

/// `POST /api/chat`: forward `{sessionId, action, chatInput}` to the webhook.
pub async fn chat(State(state): State<AppState>, body: Bytes) -> (StatusCode, Json<ChatResponse>) {
    match handle(&state, &body).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse::Success(reply.into()))),
        Err(err) => {
            let (status, failure) = relay_error_to_response(&err);
            (status, Json(ChatResponse::Failure(failure)))
        }
    }
}

async fn handle(state: &AppState, body: &[u8]) -> Result<RelayReply, RelayError> {
    let parsed: Value = serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "chat: request body is not JSON");
        RelayError::Internal(e.to_string())
    })?;
    let request = RelayRequest::from_json(&parsed)?;
    relay::relay(state.webhook.as_deref(), request).await
}

pub(crate) fn relay_error_to_response(err: &RelayError) -> (StatusCode, ChatFailure) {
    let (status, error, response) = match err {
        RelayError::InvalidMessage => (StatusCode::BAD_REQUEST, "Invalid message format".to_owned(), None),
        RelayError::NotConfigured => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Webhook not configured".to_owned(),
            Some(relay::APOLOGY_NOT_CONFIGURED),
        ),
        RelayError::Upstream(code) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Webhook error: {code}"),
            Some(relay::APOLOGY_UPSTREAM),
        ),
        RelayError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_owned(),
            Some(relay::APOLOGY_INTERNAL),
        ),
    };
    (status, ChatFailure { success: false, error, response })
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
