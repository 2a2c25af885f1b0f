//! HTTP client for the notion-chat server.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures, timeouts and non-2xx statuses come back as
//! [`ApiError`]; the widget turns them into error messages. A 2xx reply
//! without a usable text field is not an error: it yields a fixed notice.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_ENCODING};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::widget::ChatApi;

pub const REQUEST_TIMEOUT_SECS: u64 = 50;
pub const CHAT_ACTION: &str = "sendMessage";

/// Reply fields tried in order against the relay response.
pub const REPLY_FIELDS: [&str; 4] = ["text", "message", "output", "response"];
pub const UNPARSEABLE_REPLY: &str = "收到响应，但无法解析消息内容。";
pub const LOGIN_FAILED: &str = "认证失败，请检查用户名和密码";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request failed: {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub accepted: bool,
    pub message: String,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    session_id: &'a str,
    action: &'a str,
    chat_input: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    url: Option<String>,
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /api/auth`. Rejections are an [`LoginOutcome`], not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/auth"))
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let ok = resp.status().is_success();
        let body: LoginResponse = resp.json().await?;

        let accepted = ok && body.success;
        let message = match body.message.filter(|m| !m.is_empty()) {
            Some(message) => message,
            None if accepted => String::new(),
            None => LOGIN_FAILED.to_owned(),
        };
        Ok(LoginOutcome { accepted, message })
    }

    /// `GET /api/embed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers non-2xx.
    pub async fn embed_url(&self) -> Result<Option<String>, ApiError> {
        let resp = self.http.get(self.url("/api/embed")).send().await?;
        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }
        let body: EmbedResponse = resp.json().await?;
        Ok(body.url)
    }
}

impl ChatApi for ApiClient {
    async fn send_chat(&self, session_id: &str, input: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/chat"))
            .header("X-Session-Id", session_id)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_ENCODING, "identity")
            .json(&ChatRequest { session_id, action: CHAT_ACTION, chat_input: input })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ApiError::Status(resp.status().as_u16()));
        }

        let data: Value = resp.json().await?;
        Ok(reply_text(&data).unwrap_or_else(|| UNPARSEABLE_REPLY.to_owned()))
    }
}

/// First non-empty string among [`REPLY_FIELDS`].
pub(crate) fn reply_text(data: &Value) -> Option<String> {
    REPLY_FIELDS
        .iter()
        .filter_map(|field| data.get(*field).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
