//! Chat relay: forward one message to the webhook and normalize its reply.
//!
//! DESIGN
//! ======
//! The relay validates the inbound message, posts it once through the
//! [`ChatWebhook`] seam, then reduces whatever came back to a single reply
//! string. Response handling is an ordered fallback:
//!
//! 1. non-2xx status -> [`RelayError::Upstream`], no retry
//! 2. JSON parse, then parse again from the first `{` to skip a preamble
//! 3. first usable field of [`REPLY_FIELDS`], else the placeholder
//!
//! A body that cannot be parsed at all is not an error: the caller gets the
//! placeholder with `processed = false`.

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info};

use crate::webhook::{ChatWebhook, WebhookError, WebhookPayload};

pub const DEFAULT_SESSION_ID: &str = "default-session";
pub const DEFAULT_ACTION: &str = "sendMessage";

/// Reply fields tried in order against the parsed webhook body.
pub const REPLY_FIELDS: [&str; 4] = ["text", "message", "output", "response"];

pub const PROCESSING_PLACEHOLDER: &str = "收到您的消息，正在处理中...";
pub const APOLOGY_NOT_CONFIGURED: &str = "聊天服务暂时不可用，请稍后再试。";
pub const APOLOGY_UPSTREAM: &str = "抱歉，AI 助手暂时无法回复。请稍后再试。";
pub const APOLOGY_INTERNAL: &str = "抱歉，服务出现错误。请稍后再试。";

const RAW_PREVIEW_CHARS: usize = 200;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid message format")]
    InvalidMessage,
    #[error("webhook not configured")]
    NotConfigured,
    #[error("webhook returned status {0}")]
    Upstream(u16),
    #[error("relay failed: {0}")]
    Internal(String),
}

impl From<WebhookError> for RelayError {
    fn from(e: WebhookError) -> Self {
        match e {
            WebhookError::Status { status, .. } => Self::Upstream(status),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// A validated inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub session_id: String,
    pub action: String,
    /// Trimmed, never empty.
    pub chat_input: String,
}

impl RelayRequest {
    /// Validate a decoded request body `{sessionId, action, chatInput}`.
    ///
    /// `sessionId` and `action` fall back to their defaults when absent,
    /// empty, or not strings.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::InvalidMessage`] if `chatInput` is missing, not a
    /// string, or blank.
    pub fn from_json(body: &Value) -> Result<Self, RelayError> {
        let chat_input = body
            .get("chatInput")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(RelayError::InvalidMessage)?;

        Ok(Self {
            session_id: string_or(body, "sessionId", DEFAULT_SESSION_ID),
            action: string_or(body, "action", DEFAULT_ACTION),
            chat_input: chat_input.to_owned(),
        })
    }
}

fn string_or(body: &Value, key: &str, default: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_owned()
}

/// Normalized relay result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub text: String,
    pub session_id: String,
    /// `false` when the webhook body could not be parsed and the placeholder
    /// stands in for the reply.
    pub processed: bool,
    /// RFC 3339, UTC.
    pub timestamp: String,
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Forward one message to the webhook and normalize the answer.
///
/// # Errors
///
/// Returns [`RelayError::NotConfigured`] without a webhook,
/// [`RelayError::Upstream`] for a non-2xx answer, and
/// [`RelayError::Internal`] for transport failures and timeouts.
pub async fn relay(webhook: Option<&dyn ChatWebhook>, request: RelayRequest) -> Result<RelayReply, RelayError> {
    let Some(webhook) = webhook else {
        error!("relay: N8N_CHAT_WEBHOOK_URL is not configured");
        return Err(RelayError::NotConfigured);
    };

    info!(session_id = %request.session_id, input_len = request.chat_input.len(), "relay: message received");

    let payload = WebhookPayload {
        session_id: request.session_id,
        action: request.action,
        chat_input: request.chat_input,
    };

    let raw = match webhook.send(&payload).await {
        Ok(raw) => raw,
        Err(WebhookError::Status { status, body }) => {
            error!(status, endpoint = webhook.endpoint(), body = %preview(&body), "relay: webhook returned error status");
            return Err(RelayError::Upstream(status));
        }
        Err(e) => {
            error!(error = %e, endpoint = webhook.endpoint(), "relay: webhook call failed");
            return Err(e.into());
        }
    };

    debug!(raw = %preview(&raw), "relay: raw webhook response");

    let (text, processed) = match parse_lenient(&raw) {
        Some(data) => {
            let text = select_reply(&data).unwrap_or_else(|| PROCESSING_PLACEHOLDER.to_owned());
            debug!(reply = %text, original = %data, "relay: reply selected");
            (text, true)
        }
        None => {
            error!(raw = %preview(&raw), "relay: failed to parse webhook response");
            (PROCESSING_PLACEHOLDER.to_owned(), false)
        }
    };

    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| RelayError::Internal(e.to_string()))?;

    Ok(RelayReply { text, session_id: payload.session_id, processed, timestamp })
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a webhook body as JSON, retrying from the first `{` when the body
/// carries a non-JSON preamble.
#[must_use]
pub fn parse_lenient(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }
    let start = raw.find('{')?;
    serde_json::from_str(&raw[start..]).ok()
}

/// Pick the reply from the first usable field in [`REPLY_FIELDS`].
/// Non-object values never yield a reply.
#[must_use]
pub fn select_reply(data: &Value) -> Option<String> {
    let map = data.as_object()?;
    REPLY_FIELDS
        .iter()
        .filter_map(|field| map.get(*field))
        .find_map(truthy_text)
}

/// Text for a truthy JSON value: strings as-is, other non-empty values in
/// compact JSON form. `null`, `false`, `0` and `""` yield nothing.
#[allow(clippy::float_cmp)]
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn preview(raw: &str) -> String {
    let mut out: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    if raw.chars().nth(RAW_PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
