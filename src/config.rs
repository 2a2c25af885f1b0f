//! Application configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything the handlers need is read once at startup into [`AppConfig`]
//! and shared through `AppState`. Parsing goes through a lookup function so
//! tests can feed a map instead of mutating the process environment.
//! Empty values count as unset.

use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_AUTH_USERNAME: &str = "admin";
pub const DEFAULT_AUTH_PASSWORD: &str = "admin123";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
}

/// Secrets for the login gate.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password", &"[HIDDEN]")
            .finish()
    }
}

/// HTTP Basic credentials sent to the webhook.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[HIDDEN]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    /// Present only when both username and password are configured.
    pub basic_auth: Option<BasicAuth>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub auth: AuthConfig,
    /// `None` when `N8N_CHAT_WEBHOOK_URL` is unset; the relay then answers
    /// with a "not configured" apology.
    pub webhook: Option<WebhookConfig>,
    pub debug: bool,
    pub embed_url: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build typed config from process environment variables.
    ///
    /// - `N8N_CHAT_WEBHOOK_URL`: webhook endpoint
    /// - `N8N_CHAT_AUTH_USERNAME` / `N8N_CHAT_AUTH_PASSWORD`: webhook Basic auth
    /// - `CHAT_AUTH_USERNAME` / `CHAT_AUTH_PASSWORD`: login gate, default `admin` / `admin123`
    /// - `DEBUG_MODE`: `1/true/yes/on` enables debug tracing
    /// - `NOTION_EMBED_URL`: public URL of the embedded page
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: directory of page assets to serve
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is set but is not a valid port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let auth = AuthConfig {
            username: var("CHAT_AUTH_USERNAME").unwrap_or_else(|| DEFAULT_AUTH_USERNAME.to_owned()),
            password: var("CHAT_AUTH_PASSWORD").unwrap_or_else(|| DEFAULT_AUTH_PASSWORD.to_owned()),
        };

        let webhook = var("N8N_CHAT_WEBHOOK_URL").map(|url| {
            let basic_auth = match (var("N8N_CHAT_AUTH_USERNAME"), var("N8N_CHAT_AUTH_PASSWORD")) {
                (Some(username), Some(password)) => Some(BasicAuth { username, password }),
                _ => None,
            };
            WebhookConfig { url: url.trim().to_owned(), basic_auth }
        });

        let debug = var("DEBUG_MODE")
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(false);

        Ok(Self {
            port,
            auth,
            webhook,
            debug,
            embed_url: var("NOTION_EMBED_URL"),
            static_dir: var("STATIC_DIR").map(PathBuf::from),
        })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
