//! Chat service integration for casebot.
//!
//! This module provides functionality for interacting with chat platforms like Slack:
//! - Receiving events and handing them to the dispatcher
//! - Sending messages and attachments
//! - Answering identity questions about the bot (is this me? am I mentioned?)
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Slack.

pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Attachment, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Returns the unique identifier for the bot in the chat platform,
    /// which is used to detect its own messages and its mentions.
    fn bot_user_id(&self) -> &str;

    /// Start the chat client listener.
    ///
    /// This sets up event listeners for the chat platform and begins processing
    /// incoming events until shutdown.
    async fn start(&self) -> Void;

    /// Send a plain text message to a channel.
    async fn send_message(&self, channel_id: &str, text: &str) -> Void;

    /// Send a message carrying a single attachment to a channel.
    async fn send_attachment(&self, channel_id: &str, attachment: &Attachment) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }

    /// The mention token for the bot, e.g. `<@U12345>`.
    pub fn bot_mention(&self) -> String {
        format!("<@{}>", self.bot_user_id())
    }

    /// Whether `user_id` is the bot itself.
    pub fn is_message_from_me(&self, user_id: &str) -> bool {
        user_id == self.bot_user_id()
    }

    /// Whether `text` mentions the bot.
    pub fn is_bot_mention(&self, text: &str) -> bool {
        text.contains(&self.bot_mention())
    }

    /// `text` with a leading bot mention (and the whitespace or colon after it) removed.
    pub fn strip_bot_mention<'a>(&self, text: &'a str) -> &'a str {
        let trimmed = text.trim_start();

        match trimmed.strip_prefix(&self.bot_mention()) {
            Some(rest) => rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace()),
            None => text,
        }
    }
}

// Mocks.
