//! Routes one event to at most one reply.

use tracing::{debug, error, info, instrument, warn};

use crate::{
    base::{
        messages,
        types::{Command, Reply, Void},
    },
    interaction::{
        command::classify,
        event::{Event, MessageEvent},
        writer::MessageWriter,
    },
    service::{chat::ChatClient, court_listener::CourtListener},
};

/// Event dispatcher.
///
/// Holds no per-event state; cloning it is cheap.
#[derive(Clone)]
pub struct Dispatcher {
    chat: ChatClient,
    writer: MessageWriter,
    court_listener: CourtListener,
}

impl Dispatcher {
    pub fn new(chat: ChatClient, court_listener: CourtListener) -> Self {
        let writer = MessageWriter::new(chat.clone());
        Self { chat, writer, court_listener }
    }

    /// Dispatch `event` and send the resulting reply, if any.
    #[instrument(skip_all, fields(event_type = event.event_type()))]
    pub async fn handle(&self, event: Event) -> Void {
        if let Some(reply) = self.dispatch(event).await {
            debug!(channel = reply.channel(), "Sending reply.");
            self.writer.write(&reply).await?;
        }

        Ok(())
    }

    /// Decide the reply for `event`.
    pub async fn dispatch(&self, event: Event) -> Option<Reply> {
        match event {
            Event::Error { channel: Some(channel), raw } => {
                warn!("Received error event: {}", raw);
                Some(Reply::Error { channel, text: raw.to_string() })
            }
            Event::Error { channel: None, raw } => {
                error!("Received error event with no channel to report it to: {}", raw);
                None
            }
            Event::Message(message) => self.dispatch_message(message).await,
            Event::ChannelJoined { channel } | Event::GroupJoined { channel } => {
                info!("Joined `{}`.", channel);
                Some(Reply::Help { channel })
            }
            Event::Other { event_type } => {
                debug!("Ignoring `{}` event.", event_type);
                None
            }
        }
    }

    async fn dispatch_message(&self, message: MessageEvent) -> Option<Reply> {
        let direct = message.is_direct_message();

        // Skip system and webhook messages, and our own.
        let Some(user) = message.user else {
            debug!("Ignoring message without a user.");
            return None;
        };

        if self.chat.is_message_from_me(&user) {
            debug!("Ignoring our own message.");
            return None;
        }

        let channel = message.channel;

        // Only talk when spoken to.
        if !direct && !self.chat.is_bot_mention(&message.text) {
            return None;
        }

        let text = self.chat.strip_bot_mention(&message.text);

        let reply = match classify(text) {
            Command::Help => Reply::Help { channel },
            Command::Greeting => Reply::Greeting { channel, user },
            Command::AttachmentDemo => Reply::Attachment { channel },
            Command::Echo(_) => Reply::Message { channel, text: message.text },
            Command::Find(query) => {
                let text = match self.court_listener.find(&query).await {
                    Ok(reply) => reply,
                    Err(err) => {
                        error!("Case search for `{}` failed: {:#}", query, err);
                        messages::FETCH_FAILURE.to_string()
                    }
                };

                if text.is_empty() {
                    debug!("No matches for query: {}", query);
                    return None;
                }

                Reply::Message { channel, text }
            }
            Command::CitationLookup(citation) => {
                let text = match self.court_listener.resolve(&citation).await {
                    Ok(resolution) => resolution.into_reply(),
                    Err(err) => {
                        error!("Citation lookup for `{}` failed: {:#}", citation, err);
                        messages::FETCH_FAILURE.to_string()
                    }
                };

                Reply::Message { channel, text }
            }
            Command::Unrecognized { diagnostic: Some(diagnostic) } => {
                warn!("Unusable command: {}", diagnostic);
                Reply::Message {
                    channel,
                    text: messages::DOES_NOT_COMPUTE.to_string(),
                }
            }
            Command::Unrecognized { diagnostic: None } => Reply::Prompt { channel },
        };

        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::service::{
        chat::mock::{self as chat_mock, MockChat},
        http::{
            HttpClient,
            mock::{self as http_mock, MockHttp},
        },
    };

    const BASE: &str = "https://www.courtlistener.com";

    fn dispatcher(chat: MockChat, http: MockHttp) -> Dispatcher {
        Dispatcher::new(ChatClient::new(Arc::new(chat)), CourtListener::with_base_url(BASE, HttpClient::new(Arc::new(http))))
    }

    /// A dispatcher whose HTTP client must never be called.
    fn offline() -> Dispatcher {
        let mut http = MockHttp::new();
        http.expect_get().never();
        dispatcher(chat_mock::with_bot_id(), http)
    }

    fn message(channel: &str, user: Option<&str>, text: &str) -> Event {
        Event::Message(MessageEvent {
            channel: channel.to_string(),
            user: user.map(str::to_string),
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn own_messages_are_ignored() {
        let reply = offline().dispatch(message("D1", Some("U0CASEBOT"), "help")).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn messages_without_user_are_ignored() {
        let reply = offline().dispatch(message("D1", None, "help")).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn channel_chatter_without_mention_is_ignored() {
        let reply = offline().dispatch(message("C1", Some("U1"), "help")).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn direct_messages_need_no_mention() {
        let reply = offline().dispatch(message("D1", Some("U1"), "help")).await;
        assert_eq!(reply, Some(Reply::Help { channel: "D1".to_string() }));
    }

    #[tokio::test]
    async fn mentions_in_channels_are_answered() {
        let reply = offline().dispatch(message("C1", Some("U1"), "<@U0CASEBOT> hello")).await;
        assert_eq!(reply, Some(Reply::Greeting { channel: "C1".to_string(), user: "U1".to_string() }));
    }

    #[tokio::test]
    async fn echo_repeats_the_whole_text_verbatim() {
        let reply = offline().dispatch(message("C1", Some("U1"), "<@U0CASEBOT> echo me")).await;
        assert_eq!(reply, Some(Reply::Message { channel: "C1".to_string(), text: "<@U0CASEBOT> echo me".to_string() }));
    }

    #[tokio::test]
    async fn attachment_request_yields_attachment() {
        let reply = offline().dispatch(message("D1", Some("U1"), "attachment please")).await;
        assert_eq!(reply, Some(Reply::Attachment { channel: "D1".to_string() }));
    }

    #[tokio::test]
    async fn unknown_text_yields_prompt() {
        let reply = offline().dispatch(message("D1", Some("U1"), "what is the law")).await;
        assert_eq!(reply, Some(Reply::Prompt { channel: "D1".to_string() }));
    }

    #[tokio::test]
    async fn bare_find_does_not_compute() {
        let reply = offline().dispatch(message("D1", Some("U1"), "find")).await;
        assert_eq!(reply, Some(Reply::Message { channel: "D1".to_string(), text: "Does not compute.".to_string() }));
    }

    #[tokio::test]
    async fn find_sends_the_formatted_result() {
        // The search result itself, not some other value, must be what is sent.
        let mut http = MockHttp::new();
        http.expect_get()
            .with(eq("https://www.courtlistener.com/api/rest/v3/search/?format=json&q=casename%3A(doe)"), eq("application/json"))
            .times(1)
            .returning(|url, _| {
                let body = json!({
                    "count": 1,
                    "results": [{
                        "caseName": "Doe v. Roe",
                        "absolute_url": "/x/1/",
                        "dateFiled": "2001-05-01",
                        "citation": ["123 F.3d 456"],
                        "court_citation_string": "9th Cir."
                    }]
                });
                Ok(http_mock::ok(url, &body.to_string()))
            });

        let reply = dispatcher(chat_mock::with_bot_id(), http).dispatch(message("D1", Some("U1"), "find doe")).await;

        assert_eq!(
            reply,
            Some(Reply::Message {
                channel: "D1".to_string(),
                text: "Doe v. Roe, 123 F.3d 456 (9th Cir. 2001)\nhttps://www.courtlistener.com/x/1/".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn find_failure_yields_generic_failure_reply() {
        let mut http = MockHttp::new();
        http.expect_get().times(1).returning(|_, _| Err(anyhow::anyhow!("timed out")));

        let reply = dispatcher(chat_mock::with_bot_id(), http).dispatch(message("D1", Some("U1"), "find doe")).await;

        assert_eq!(reply, Some(Reply::Message { channel: "D1".to_string(), text: messages::FETCH_FAILURE.to_string() }));
    }

    #[tokio::test]
    async fn find_with_malformed_record_yields_generic_failure_reply() {
        let mut http = MockHttp::new();
        http.expect_get()
            .times(1)
            .returning(|url, _| Ok(http_mock::ok(url, &json!({ "count": 1, "results": [{ "caseName": "Doe v. Roe", "citation": [] }] }).to_string())));

        let reply = dispatcher(chat_mock::with_bot_id(), http).dispatch(message("D1", Some("U1"), "find doe")).await;

        assert_eq!(reply, Some(Reply::Message { channel: "D1".to_string(), text: messages::FETCH_FAILURE.to_string() }));
    }

    #[tokio::test]
    async fn citation_resolves_to_final_url() {
        let mut http = MockHttp::new();
        http.expect_get()
            .with(eq("https://www.courtlistener.com/c/U.S./410/113/"), eq("text/html"))
            .times(1)
            .returning(|_, _| Ok(http_mock::status("https://www.courtlistener.com/opinion/108713/roe-v-wade/", 200)));

        let reply = dispatcher(chat_mock::with_bot_id(), http).dispatch(message("C1", Some("U1"), "<@U0CASEBOT> 410 U.S. 113")).await;

        assert_eq!(
            reply,
            Some(Reply::Message {
                channel: "C1".to_string(),
                text: "https://www.courtlistener.com/opinion/108713/roe-v-wade/".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn unknown_citation_yields_apology() {
        let mut http = MockHttp::new();
        http.expect_get().times(1).returning(|url, _| Ok(http_mock::status(url, 404)));

        let reply = dispatcher(chat_mock::with_bot_id(), http).dispatch(message("D1", Some("U1"), "999 U.S. 999")).await;

        assert_eq!(reply, Some(Reply::Message { channel: "D1".to_string(), text: messages::CITATION_NOT_FOUND.to_string() }));
    }

    #[tokio::test]
    async fn joins_yield_help() {
        let dispatcher = offline();

        assert_eq!(dispatcher.dispatch(Event::ChannelJoined { channel: "C9".to_string() }).await, Some(Reply::Help { channel: "C9".to_string() }));
        assert_eq!(dispatcher.dispatch(Event::GroupJoined { channel: "G9".to_string() }).await, Some(Reply::Help { channel: "G9".to_string() }));
    }

    #[tokio::test]
    async fn error_events_are_forwarded_as_json() {
        let raw = json!({ "type": "error", "channel": "C1", "error": { "msg": "boom" } });
        let reply = offline().dispatch(Event::Error { channel: Some("C1".to_string()), raw: raw.clone() }).await;

        assert_eq!(reply, Some(Reply::Error { channel: "C1".to_string(), text: raw.to_string() }));
    }

    #[tokio::test]
    async fn error_events_without_channel_get_no_reply() {
        let raw = json!({ "type": "error", "error": { "code": 1, "msg": "Socket URL has expired" } });
        let reply = offline().dispatch(Event::Error { channel: None, raw }).await;

        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn other_events_are_ignored() {
        let reply = offline().dispatch(Event::Other { event_type: "presence_change".to_string() }).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn handle_sends_exactly_one_message() {
        let mut chat = chat_mock::with_bot_id();
        chat.expect_send_message().with(eq("C7"), eq(messages::HELP_MESSAGE)).times(1).returning(|_, _| Ok(()));
        let mut http = MockHttp::new();
        http.expect_get().never();

        dispatcher(chat, http).handle(Event::ChannelJoined { channel: "C7".to_string() }).await.unwrap();
    }

    #[tokio::test]
    async fn handle_sends_nothing_for_filtered_messages() {
        let mut chat = chat_mock::with_bot_id();
        chat.expect_send_message().never();
        chat.expect_send_attachment().never();
        let mut http = MockHttp::new();
        http.expect_get().never();

        dispatcher(chat, http).handle(message("C1", Some("U1"), "find doe")).await.unwrap();
    }
}
