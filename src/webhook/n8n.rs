//! n8n webhook client.
//!
//! Thin HTTP wrapper: one POST with a JSON body, standard headers, optional
//! Basic auth and a fixed 50-second timeout. Status handling is left to the
//! caller through [`WebhookError::Status`].

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_ENCODING, USER_AGENT};

use super::types::{ChatWebhook, WebhookError, WebhookPayload};
use crate::config::WebhookConfig;

pub const WEBHOOK_TIMEOUT_SECS: u64 = 50;
pub const SESSION_HEADER: &str = "X-Session-Id";
const CLIENT_USER_AGENT: &str = concat!("notion-chat/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// CLIENT
// =============================================================================

pub struct N8nClient {
    http: reqwest::Client,
    config: WebhookConfig,
}

impl N8nClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| WebhookError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl ChatWebhook for N8nClient {
    async fn send(&self, payload: &WebhookPayload) -> Result<String, WebhookError> {
        tracing::debug!(
            url = %self.config.url,
            content_type = "application/json",
            accept = "application/json",
            accept_encoding = "identity",
            user_agent = CLIENT_USER_AGENT,
            x_session_id = %payload.session_id,
            authorization = if self.config.basic_auth.is_some() { "[HIDDEN]" } else { "none" },
            body = ?payload,
            "webhook: sending request"
        );

        let mut request = self
            .http
            .post(&self.config.url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_ENCODING, "identity")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(SESSION_HEADER, &payload.session_id)
            .json(payload);
        if let Some(auth) = &self.config.basic_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            // A failed body read must not mask the status.
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status { status: status.as_u16(), body });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                WebhookError::Timeout { secs: WEBHOOK_TIMEOUT_SECS }
            } else {
                WebhookError::BodyRead(e.to_string())
            }
        })?;

        Ok(text)
    }

    fn endpoint(&self) -> &str {
        &self.config.url
    }
}

fn map_send_error(e: reqwest::Error) -> WebhookError {
    if e.is_timeout() {
        WebhookError::Timeout { secs: WEBHOOK_TIMEOUT_SECS }
    } else {
        WebhookError::Request(e.to_string())
    }
}

#[cfg(test)]
#[path = "n8n_test.rs"]
mod tests;
