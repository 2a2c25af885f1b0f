mod config;
mod routes;
mod services;
mod state;
mod webhook;

use tracing::Level;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("webhook client: {0}")]
    Webhook(#[from] webhook::WebhookError),
    #[error("server io: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let config = config::AppConfig::from_env()?;

    let level = if config.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Missing webhook URL is non-fatal: the relay answers with an apology.
    let hook = webhook::from_config(config.webhook.as_ref())?;
    match &config.webhook {
        Some(wh) => tracing::info!(url = %wh.url, basic_auth = wh.basic_auth.is_some(), "webhook configured"),
        None => tracing::warn!("N8N_CHAT_WEBHOOK_URL not set, chat relay disabled"),
    }
    if config.embed_url.is_none() {
        tracing::warn!("NOTION_EMBED_URL not set, page will show the setup notice");
    }

    let port = config.port;
    let state = state::AppState::new(config, hook);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "notion-chat listening");
    axum::serve(listener, app).await?;
    Ok(())
}
