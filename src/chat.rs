//! Local chat with a scripted bot
//!
//! Nothing leaves the process: every user message gets a canned reply
//! after a short delay.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Author {
    You,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub txt: String,
    pub by: Author,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(by: Author, txt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            txt: txt.into(),
            by,
            timestamp: Utc::now(),
        }
    }
}

/// Conversation log. Cloning shares the log.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: watch::Sender<Vec<ChatMessage>>,
    reply_delay: Duration,
}

impl ChatSession {
    pub fn new(reply_delay: Duration) -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self {
            messages,
            reply_delay,
        }
    }

    pub fn bot_reply(txt: &str) -> String {
        format!("Thanks for your message: \"{}\"! How can I help you?", txt)
    }

    /// Append the user's message and schedule the bot reply.
    ///
    /// Returns `false` for blank input, which is ignored. Must be called
    /// from within a tokio runtime.
    pub fn send(&self, txt: &str) -> bool {
        if txt.trim().is_empty() {
            return false;
        }
        self.push(ChatMessage::new(Author::You, txt));

        let reply = Self::bot_reply(txt);
        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(session.reply_delay).await;
            session.push(ChatMessage::new(Author::Bot, reply));
        });
        true
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }

    fn push(&self, message: ChatMessage) {
        tracing::trace!(by = ?message.by, "Chat message");
        self.messages.send_modify(|log| log.push(message));
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}
