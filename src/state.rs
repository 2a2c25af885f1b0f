//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the configuration parsed once at startup and the webhook client
//! built from it. Nothing in it is mutated after startup.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::webhook::ChatWebhook;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` if `N8N_CHAT_WEBHOOK_URL` is not configured.
    pub webhook: Option<Arc<dyn ChatWebhook>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: AppConfig, webhook: Option<Arc<dyn ChatWebhook>>) -> Self {
        Self { config: Arc::new(config), webhook }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::webhook::{WebhookError, WebhookPayload};
    use std::sync::Mutex;

    /// Scripted webhook: answers the first call with a fixed result and
    /// records every payload it receives.
    pub struct MockWebhook {
        reply: Mutex<Option<Result<String, WebhookError>>>,
        pub sent: Mutex<Vec<WebhookPayload>>,
    }

    impl MockWebhook {
        #[must_use]
        pub fn replying(body: &str) -> Self {
            Self { reply: Mutex::new(Some(Ok(body.to_owned()))), sent: Mutex::new(Vec::new()) }
        }

        #[must_use]
        pub fn failing(err: WebhookError) -> Self {
            Self { reply: Mutex::new(Some(Err(err))), sent: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait::async_trait]
    impl ChatWebhook for MockWebhook {
        async fn send(&self, payload: &WebhookPayload) -> Result<String, WebhookError> {
            self.sent.lock().unwrap().push(payload.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok("{}".to_owned()))
        }

        fn endpoint(&self) -> &str {
            "mock://webhook"
        }
    }

    /// Default config: gate `admin` / `admin123`, no webhook, no embed URL.
    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig::from_lookup(|_| None).expect("empty config should parse")
    }

    /// Create a test `AppState` without a webhook.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(test_config(), None)
    }

    /// Create a test `AppState` backed by a mock webhook.
    #[must_use]
    pub fn test_app_state_with_webhook(webhook: Arc<MockWebhook>) -> AppState {
        AppState::new(test_config(), Some(webhook))
    }
}
