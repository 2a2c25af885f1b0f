mod api;
mod store;
mod widget;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use time::macros::format_description;
use tokio::io::{AsyncBufReadExt, BufReader};

use api::{ApiClient, ApiError};
use store::{ClientStore, StoreError};
use widget::{Author, ChatWidget, Message, Turn, WidgetError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("网络错误，请稍后重试 ({0})")]
    Network(#[from] ApiError),
    #[error("{0}")]
    Widget(#[from] WidgetError),
    #[error("terminal io: {0}")]
    Io(#[from] std::io::Error),
    #[error("not logged in; run `notion-chat-cli login` first")]
    NotAuthenticated,
    #[error("{0}")]
    LoginRejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "notion-chat-cli", about = "Terminal chat widget for the notion-chat relay")]
struct Cli {
    #[arg(long, env = "NOTION_CHAT_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "NOTION_CHAT_STORE", default_value = ".notion-chat.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check credentials against the auth gate and remember the result.
    Login {
        #[arg(long, env = "CHAT_USERNAME")]
        username: String,
        #[arg(long, env = "CHAT_PASSWORD")]
        password: String,
    },
    Logout,
    /// Interactive chat; `/retry` resends the latest failed message, `/quit` exits.
    Chat,
    /// Send one message and print the reply.
    Send { message: String },
    /// Print the configured Notion embed URL.
    Embed,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.base_url)?;

    match cli.command {
        Command::Login { username, password } => run_login(&client, &cli.store, &username, &password).await,
        Command::Logout => run_logout(&cli.store),
        Command::Chat => run_chat(&client, &cli.store).await,
        Command::Send { message } => run_send(&client, &cli.store, &message).await,
        Command::Embed => run_embed(&client).await,
    }
}

async fn run_login(client: &ApiClient, path: &Path, username: &str, password: &str) -> Result<(), CliError> {
    let mut store = ClientStore::load_or_create(path)?;
    let outcome = client.login(username, password).await?;
    if !outcome.accepted {
        return Err(CliError::LoginRejected(outcome.message));
    }
    store.authenticated = true;
    store.save(path)?;
    println!("{}", outcome.message);
    Ok(())
}

fn run_logout(path: &Path) -> Result<(), CliError> {
    let mut store = ClientStore::load_or_create(path)?;
    store.authenticated = false;
    store.save(path)?;
    println!("logged out");
    Ok(())
}

fn authenticated_store(path: &Path) -> Result<ClientStore, CliError> {
    let store = ClientStore::load_or_create(path)?;
    if !store.authenticated {
        return Err(CliError::NotAuthenticated);
    }
    Ok(store)
}

async fn run_chat(client: &ApiClient, path: &Path) -> Result<(), CliError> {
    let store = authenticated_store(path)?;
    let mut widget = ChatWidget::new(store.session_id);
    println!("session {}", widget.session_id());
    for message in widget.messages() {
        println!("{}", render(message));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let turn = match input {
            "" => continue,
            "/quit" => break,
            "/retry" => {
                let Some(id) = widget.latest_error().map(|m| m.id) else {
                    eprintln!("nothing to retry");
                    continue;
                };
                let turn = widget.retry(client, id).await?;
                if let Some(prompt) = widget.message(turn.prompt) {
                    println!("{}", render(prompt));
                }
                turn
            }
            _ => widget.send(client, input).await?,
        };
        print_turn(&widget, &turn);
    }
    Ok(())
}

async fn run_send(client: &ApiClient, path: &Path, message: &str) -> Result<(), CliError> {
    let store = authenticated_store(path)?;
    let mut widget = ChatWidget::new(store.session_id);
    let turn = widget.send(client, message).await?;
    print_turn(&widget, &turn);
    match turn.failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

async fn run_embed(client: &ApiClient) -> Result<(), CliError> {
    match client.embed_url().await? {
        Some(url) => println!("{url}"),
        None => eprintln!("NOTION_EMBED_URL is not configured on the server"),
    }
    Ok(())
}

fn print_turn(widget: &ChatWidget, turn: &Turn) {
    let Some(reply) = widget.message(turn.reply) else { return };
    if let Some(err) = &turn.failure {
        eprintln!("{}", render(reply));
        eprintln!("  ({err}; type /retry to resend)");
    } else {
        println!("{}", render(reply));
    }
}

fn render(message: &Message) -> String {
    let stamp = message
        .timestamp
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default();
    let who = match message.author {
        Author::User => "you",
        Author::Assistant => "assistant",
    };
    format!("[{stamp}] {who}: {}", message.content)
}
