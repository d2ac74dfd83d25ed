//! RTM-shaped event records.
//!
//! Events arrive as loose JSON objects tagged by a `type` field. Only the
//! handful of types the bot reacts to are modelled; everything else is kept
//! as `Other` so it can be ignored without an error.

use anyhow::anyhow;
use serde::Deserialize;
use serde_json::Value;

use crate::base::types::Res;

/// A message posted to a channel the bot can see.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    pub channel: String,
    /// Absent for system and webhook messages.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: String,
}

impl MessageEvent {
    /// Direct message channel ids start with `D`.
    pub fn is_direct_message(&self) -> bool {
        self.channel.starts_with('D')
    }
}

/// One incoming event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Error { channel: Option<String>, raw: Value },
    Message(MessageEvent),
    ChannelJoined { channel: String },
    GroupJoined { channel: String },
    Other { event_type: String },
}

impl Event {
    /// Parse an event record.
    ///
    /// Records without a `type` yield `None`. Records of a known type that
    /// lack the fields that type needs are errors.
    pub fn from_value(value: Value) -> Res<Option<Self>> {
        let Some(event_type) = value.get("type").and_then(Value::as_str).map(str::to_string) else {
            return Ok(None);
        };

        let event = match event_type.as_str() {
            "error" => Event::Error {
                channel: value.get("channel").and_then(channel_id),
                raw: value.clone(),
            },
            "message" => Event::Message(serde_json::from_value(value)?),
            "channel_joined" => Event::ChannelJoined { channel: required_channel(&value)? },
            "group_joined" => Event::GroupJoined { channel: required_channel(&value)? },
            other => Event::Other { event_type: other.to_string() },
        };

        Ok(Some(event))
    }

    pub fn event_type(&self) -> &str {
        match self {
            Event::Error { .. } => "error",
            Event::Message(_) => "message",
            Event::ChannelJoined { .. } => "channel_joined",
            Event::GroupJoined { .. } => "group_joined",
            Event::Other { event_type } => event_type,
        }
    }
}

/// A channel reference is either a bare id or an object with an `id`.
fn channel_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

fn required_channel(value: &Value) -> Res<String> {
    value.get("channel").and_then(channel_id).ok_or_else(|| anyhow!("`{}` event has no channel.", value["type"]))
}
