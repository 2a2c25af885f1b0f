//! Webhook: outbound adapter for the n8n chat workflow.
//!
//! DESIGN
//! ======
//! The relay talks to the webhook through the [`ChatWebhook`] trait so route
//! and service tests can substitute a scripted mock. [`N8nClient`] is the only
//! real implementation: one POST per message, fixed timeout, optional Basic
//! auth.

pub mod n8n;
pub mod types;

use std::sync::Arc;

use crate::config::WebhookConfig;
pub use n8n::N8nClient;
pub use types::{ChatWebhook, WebhookError, WebhookPayload};

/// Build the webhook client for a config, or `None` if no URL is configured.
///
/// # Errors
///
/// Returns an error if the HTTP client fails to build.
pub fn from_config(config: Option<&WebhookConfig>) -> Result<Option<Arc<dyn ChatWebhook>>, WebhookError> {
    let Some(config) = config else {
        return Ok(None);
    };
    let client = N8nClient::new(config.clone())?;
    Ok(Some(Arc::new(client)))
}
