//! Slack Socket Mode implementation of the chat service.
//!
//! Slack's Events API delivers push events rather than RTM records, so each
//! push event is serialized and reshaped into the RTM form the dispatcher
//! understands before it is handed over.

use crate::{
    base::{
        config::Config,
        messages,
        types::{Attachment, Res, Void},
    },
    interaction::{self, dispatch::Dispatcher},
    service::court_listener::CourtListener,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::{Value, json};
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config, court_listener: CourtListener) -> Res<Self> {
        let client = SlackChatClient::new(config, court_listener).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    dispatcher: Dispatcher,
    bot_user_id: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
    pub court_listener: CourtListener,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config, court_listener: CourtListener) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
            court_listener,
        })
    }

    async fn post(&self, channel_id: &str, content: SlackMessageContent) -> Void {
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), content).with_as_user(true).with_link_names(true);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    async fn start(&self) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let dispatcher = Dispatcher::new(ChatClient::from(self.clone()), self.court_listener.clone());

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            dispatcher,
            bot_user_id: self.bot_user_id.clone(),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events.
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Serve until Ctrl-C.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_message(&self, channel_id: &str, text: &str) -> Void {
        self.post(channel_id, SlackMessageContent::new().with_text(text.to_string())).await
    }

    #[instrument(skip(self))]
    async fn send_attachment(&self, channel_id: &str, attachment: &Attachment) -> Void {
        let content = SlackMessageContent::new().with_text(attachment.fallback.clone()).with_attachments(vec![slack_attachment(attachment)]);

        self.post(channel_id, content).await
    }
}

/// Slack's attachment model has no `title_link`, so the linked title and the
/// body travel as one mrkdwn section block inside the coloured attachment.
fn slack_attachment(attachment: &Attachment) -> SlackMessageAttachment {
    let body = format!("*<{}|{}>*\n{}", attachment.title_link, attachment.title, attachment.text);
    let section = SlackSectionBlock::new().with_text(SlackBlockText::MarkDown(SlackBlockMarkDownText::new(body)));

    SlackMessageAttachment::new()
        .with_color(attachment.color.clone())
        .with_fallback(attachment.fallback.clone())
        .with_blocks(vec![section.into()])
}

// Push event normalization.

/// Reshape a serialized Slack push event into an RTM event record.
///
/// Returns `None` for events that must not reach the dispatcher:
/// - channel messages that mention the bot, since the matching
///   `app_mention` event carries the same text;
/// - other users joining channels.
pub fn normalize_push_event(mut raw: Value, bot_user_id: &str) -> Option<Value> {
    let event_type = raw.get("type").and_then(Value::as_str)?.to_string();

    match event_type.as_str() {
        "message" => {
            let channel = raw.get("channel").and_then(Value::as_str).unwrap_or_default();
            let text = raw.get("text").and_then(Value::as_str).unwrap_or_default();

            if !channel.starts_with('D') && text.contains(&format!("<@{bot_user_id}>")) {
                return None;
            }

            Some(raw)
        }
        "app_mention" => {
            raw["type"] = Value::from("message");
            Some(raw)
        }
        "member_joined_channel" => {
            if raw.get("user").and_then(Value::as_str) != Some(bot_user_id) {
                return None;
            }

            let joined = if raw.get("channel_type").and_then(Value::as_str) == Some("G") { "group_joined" } else { "channel_joined" };

            Some(json!({ "type": joined, "channel": raw.get("channel").cloned().unwrap_or(Value::Null) }))
        }
        _ => Some(raw),
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    debug!("[COMMAND] {:#?}", event);
    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text(messages::HELP_MESSAGE.into())))
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("[INTERACTION] {:#?}", event);
    Ok(())
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    let raw = serde_json::to_value(&event_callback.event)?;

    match normalize_push_event(raw, &user_state.bot_user_id) {
        Some(raw) => interaction::rtm_event::handle_rtm_event(raw, user_state.dispatcher.clone()),
        None => debug!("Skipping push event."),
    }

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    const BOT: &str = "U0CASEBOT";

    #[test]
    fn direct_messages_pass_through() {
        let raw = json!({ "type": "message", "channel": "D1", "user": "U1", "text": "<@U0CASEBOT> find roe" });
        assert_eq!(normalize_push_event(raw.clone(), BOT), Some(raw));
    }

    #[test]
    fn channel_messages_without_mention_pass_through() {
        let raw = json!({ "type": "message", "channel": "C1", "user": "U1", "text": "lunch?" });
        assert_eq!(normalize_push_event(raw.clone(), BOT), Some(raw));
    }

    #[test]
    fn channel_messages_with_mention_defer_to_app_mention() {
        let raw = json!({ "type": "message", "channel": "C1", "user": "U1", "text": "<@U0CASEBOT> find roe" });
        assert_eq!(normalize_push_event(raw, BOT), None);
    }

    #[test]
    fn app_mention_becomes_message() {
        let raw = json!({ "type": "app_mention", "channel": "C1", "user": "U1", "text": "<@U0CASEBOT> find roe", "ts": "1.2" });

        let normalized = normalize_push_event(raw, BOT).unwrap();

        assert_eq!(normalized["type"], "message");
        assert_eq!(normalized["text"], "<@U0CASEBOT> find roe");
    }

    #[test]
    fn bot_joining_public_channel_is_channel_joined() {
        let raw = json!({ "type": "member_joined_channel", "user": BOT, "channel": "C9", "channel_type": "C", "team": "T1" });
        assert_eq!(normalize_push_event(raw, BOT), Some(json!({ "type": "channel_joined", "channel": "C9" })));
    }

    #[test]
    fn bot_joining_private_channel_is_group_joined() {
        let raw = json!({ "type": "member_joined_channel", "user": BOT, "channel": "G9", "channel_type": "G", "team": "T1" });
        assert_eq!(normalize_push_event(raw, BOT), Some(json!({ "type": "group_joined", "channel": "G9" })));
    }

    #[test]
    fn other_members_joining_are_skipped() {
        let raw = json!({ "type": "member_joined_channel", "user": "U1", "channel": "C9", "channel_type": "C" });
        assert_eq!(normalize_push_event(raw, BOT), None);
    }

    #[test]
    fn untyped_events_are_skipped() {
        assert_eq!(normalize_push_event(json!({ "ok": true }), BOT), None);
    }

    #[test]
    fn demo_attachment_keeps_its_link_on_the_wire() {
        let attachment = crate::interaction::writer::demo_attachment();
        let content = SlackMessageContent::new().with_text(attachment.fallback.clone()).with_attachments(vec![slack_attachment(&attachment)]);

        let wire = serde_json::to_value(&content).unwrap();
        let sent = &wire["attachments"][0];

        assert_eq!(wire["text"], attachment.fallback.as_str());
        assert_eq!(sent["color"], attachment.color.as_str());
        assert_eq!(sent["fallback"], attachment.fallback.as_str());

        let section = &sent["blocks"][0];
        assert_eq!(section["type"], "section");
        assert_eq!(section["text"]["type"], "mrkdwn");

        let text = section["text"]["text"].as_str().unwrap();
        assert!(text.contains(&format!("<{}|{}>", attachment.title_link, attachment.title)));
        assert!(text.contains(&attachment.text));
    }

    #[test]
    fn slack_payloads_survive_the_push_event_model() {
        let payloads = [
            (
                json!({ "type": "app_mention", "user": "U1", "channel": "C1", "text": "<@U0CASEBOT> 410 U.S. 113", "ts": "1700000000.000100", "event_ts": "1700000000.000100" }),
                json!({ "type": "message", "channel": "C1", "user": "U1", "text": "<@U0CASEBOT> 410 U.S. 113" }),
            ),
            (
                json!({ "type": "message", "user": "U1", "channel": "D1", "channel_type": "im", "text": "find roe", "ts": "1700000000.000200" }),
                json!({ "type": "message", "channel": "D1", "user": "U1", "text": "find roe" }),
            ),
            (
                json!({ "type": "member_joined_channel", "user": BOT, "channel": "G9", "channel_type": "G", "team": "T1" }),
                json!({ "type": "group_joined", "channel": "G9" }),
            ),
        ];

        for (payload, expected) in payloads {
            let body: SlackEventCallbackBody = serde_json::from_value(payload.clone()).unwrap();
            assert!(!matches!(body, SlackEventCallbackBody::Unknown(_)), "{payload} fell through to Unknown");

            let normalized = normalize_push_event(serde_json::to_value(&body).unwrap(), BOT).unwrap();

            for (key, value) in expected.as_object().unwrap() {
                assert_eq!(&normalized[key], value, "{key} of {payload}");
            }

            // The RTM parser accepts what comes out.
            assert!(crate::interaction::event::Event::from_value(normalized).unwrap().is_some());
        }
    }
}
