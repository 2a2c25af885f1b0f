//! Chat widget state: one conversation, one request in flight at a time.
//!
//! DESIGN
//! ======
//! The conversation is an ordered list of immutable messages. A send appends
//! the user message immediately, then exactly one reply: the assistant text
//! on success, or an error message carrying the original input on failure.
//! Retrying an error message removes it and replays the send path with the
//! saved input as a fresh user turn.
//!
//! The transitions are split into `begin_*` / `finish` so they can be driven
//! without a network; `send` and `retry` wire them to a [`ChatApi`].

use time::OffsetDateTime;

use crate::api::ApiError;

pub const GREETING: &str = "您好！我是您的书签管理助手，有什么可以帮助您的吗？";
pub const SEND_FAILED: &str = "抱歉，发送消息时出现错误。请检查网络连接后重试。";
pub const RETRY_FAILED: &str = "抱歉，重试时仍然出现错误。请检查网络连接后重试。";

// =============================================================================
// TYPES
// =============================================================================

/// Identifier in generation order; a larger id was created later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub author: Author,
    pub timestamp: OffsetDateTime,
    pub is_error: bool,
    /// Set only on error messages, so the input can be sent again.
    pub original_input: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Sending,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum WidgetError {
    #[error("message is empty")]
    EmptyInput,
    #[error("a message is already being sent")]
    Busy,
    #[error("no message with id {0}")]
    UnknownMessage(MessageId),
    #[error("message {0} cannot be retried")]
    NotRetryable(MessageId),
}

/// A send that has been started and awaits its result.
#[derive(Debug)]
#[must_use]
pub struct PendingSend {
    input: String,
    prompt: MessageId,
    retry: bool,
}

impl PendingSend {
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Outcome of one completed send or retry.
#[derive(Debug)]
pub struct Turn {
    /// The user message that was sent.
    pub prompt: MessageId,
    /// The assistant reply or the error message appended after it.
    pub reply: MessageId,
    /// Present when the relay call failed.
    pub failure: Option<ApiError>,
}

/// Relay transport used by the widget.
#[allow(async_fn_in_trait)]
pub trait ChatApi {
    async fn send_chat(&self, session_id: &str, input: &str) -> Result<String, ApiError>;
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct ChatWidget {
    session_id: String,
    messages: Vec<Message>,
    next_id: u64,
    phase: Phase,
}

impl ChatWidget {
    /// Start a conversation containing only the assistant greeting.
    pub fn new(session_id: impl Into<String>) -> Self {
        let mut widget = Self { session_id: session_id.into(), messages: Vec::new(), next_id: 1, phase: Phase::Idle };
        widget.push(Author::Assistant, GREETING.to_owned(), None);
        widget
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Most recent error message, the natural target of a retry.
    pub fn latest_error(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_error)
    }

    /// Append the user message and enter `Sending`.
    ///
    /// # Errors
    ///
    /// Fails on blank input or while another send is in flight.
    pub fn begin_send(&mut self, input: &str) -> Result<PendingSend, WidgetError> {
        if input.trim().is_empty() {
            return Err(WidgetError::EmptyInput);
        }
        self.ensure_idle()?;
        Ok(self.start(input.to_owned(), false))
    }

    /// Drop an error message and resend its original input as a new user turn.
    ///
    /// # Errors
    ///
    /// Fails while busy, for an unknown id, or for a message that is not a
    /// retryable error.
    pub fn begin_retry(&mut self, error_id: MessageId) -> Result<PendingSend, WidgetError> {
        self.ensure_idle()?;
        let message = self.message(error_id).ok_or(WidgetError::UnknownMessage(error_id))?;
        let input = match (&message.original_input, message.is_error) {
            (Some(input), true) => input.clone(),
            _ => return Err(WidgetError::NotRetryable(error_id)),
        };
        self.messages.retain(|m| m.id != error_id);
        Ok(self.start(input, true))
    }

    /// Append the reply for a pending send and return to `Idle`.
    pub fn finish(&mut self, pending: PendingSend, result: Result<String, ApiError>) -> Turn {
        self.phase = Phase::Idle;
        let (reply, failure) = match result {
            Ok(text) => (self.push(Author::Assistant, text, None), None),
            Err(err) => {
                let content = if pending.retry { RETRY_FAILED } else { SEND_FAILED };
                let id = self.push(Author::Assistant, content.to_owned(), Some(pending.input));
                (id, Some(err))
            }
        };
        Turn { prompt: pending.prompt, reply, failure }
    }

    /// Send `input` through `api`.
    ///
    /// # Errors
    ///
    /// Fails only for invalid transitions; relay failures become error
    /// messages and are reported in [`Turn::failure`].
    pub async fn send<A: ChatApi>(&mut self, api: &A, input: &str) -> Result<Turn, WidgetError> {
        let pending = self.begin_send(input)?;
        let result = api.send_chat(&self.session_id, pending.input()).await;
        Ok(self.finish(pending, result))
    }

    /// Retry the error message `error_id` through `api`.
    ///
    /// # Errors
    ///
    /// See [`ChatWidget::begin_retry`].
    pub async fn retry<A: ChatApi>(&mut self, api: &A, error_id: MessageId) -> Result<Turn, WidgetError> {
        let pending = self.begin_retry(error_id)?;
        let result = api.send_chat(&self.session_id, pending.input()).await;
        Ok(self.finish(pending, result))
    }

    fn ensure_idle(&self) -> Result<(), WidgetError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Sending => Err(WidgetError::Busy),
        }
    }

    fn start(&mut self, input: String, retry: bool) -> PendingSend {
        let prompt = self.push(Author::User, input.clone(), None);
        self.phase = Phase::Sending;
        PendingSend { input, prompt, retry }
    }

    fn push(&mut self, author: Author, content: String, original_input: Option<String>) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        let is_error = original_input.is_some();
        self.messages.push(Message {
            id,
            content,
            author,
            timestamp: OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc()),
            is_error,
            original_input,
        });
        id
    }
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
