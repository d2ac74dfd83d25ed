//! Turns replies into chat sends.

use tracing::instrument;

use crate::{
    base::{
        messages,
        types::{Attachment, Reply, Void},
    },
    service::chat::ChatClient,
};

/// Writes the bot's canned and computed replies to the chat platform.
#[derive(Clone)]
pub struct MessageWriter {
    chat: ChatClient,
}

impl MessageWriter {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }

    /// Send `reply` to its channel.
    #[instrument(skip(self))]
    pub async fn write(&self, reply: &Reply) -> Void {
        match reply {
            Reply::Error { channel, text } => self.write_error(channel, text).await,
            Reply::Help { channel } => self.write_help_message(channel).await,
            Reply::Greeting { channel, user } => self.write_greeting(channel, user).await,
            Reply::Prompt { channel } => self.write_prompt(channel).await,
            Reply::Attachment { channel } => self.demo_attachment(channel).await,
            Reply::Message { channel, text } => self.send_message(channel, text).await,
        }
    }

    pub async fn send_message(&self, channel_id: &str, text: &str) -> Void {
        self.chat.send_message(channel_id, text).await
    }

    pub async fn write_error(&self, channel_id: &str, raw: &str) -> Void {
        self.chat.send_message(channel_id, &messages::error_notice(raw)).await
    }

    pub async fn write_help_message(&self, channel_id: &str) -> Void {
        self.chat.send_message(channel_id, messages::HELP_MESSAGE).await
    }

    pub async fn write_greeting(&self, channel_id: &str, user_id: &str) -> Void {
        self.chat.send_message(channel_id, &messages::greeting(user_id)).await
    }

    pub async fn write_prompt(&self, channel_id: &str) -> Void {
        self.chat.send_message(channel_id, messages::PROMPT_MESSAGE).await
    }

    pub async fn demo_attachment(&self, channel_id: &str) -> Void {
        self.chat.send_attachment(channel_id, &demo_attachment()).await
    }
}

/// The attachment shown by the `attachment` command.
pub fn demo_attachment() -> Attachment {
    Attachment {
        fallback: "CourtListener: Roe v. Wade, 410 U.S. 113 (1973)".to_string(),
        title: "Roe v. Wade, 410 U.S. 113 (1973)".to_string(),
        title_link: "https://www.courtlistener.com/c/U.S./410/113/".to_string(),
        text: "This is what an attachment looks like. Ask me to `find` a case to get a real one.".to_string(),
        color: "#7CD197".to_string(),
    }
}
