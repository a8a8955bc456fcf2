//! Realtime socket envelope.
//!
//! The realtime service speaks Phoenix channels: every frame is a JSON
//! object with a topic, an event name, a payload and an optional ref.

use serde::{Deserialize, Serialize};

pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";
pub const EVENT_SYSTEM: &str = "system";

/// Topic used for socket-level heartbeats.
pub const HEARTBEAT_TOPIC: &str = "phoenix";

/// One socket frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_ref: Option<String>,
}

impl Frame {
    pub fn new(
        topic: impl Into<String>,
        event: impl Into<String>,
        payload: serde_json::Value,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            payload,
            reference: Some(reference.into()),
            join_ref: None,
        }
    }
}

/// Row-change filter sent when joining a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeFilter {
    pub event: String,
    pub schema: String,
    pub table: String,
}

/// Payload of a `phx_join` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPayload {
    pub config: JoinConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    pub broadcast: BroadcastConfig,
    pub presence: PresenceConfig,
    pub postgres_changes: Vec<ChangeFilter>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BroadcastConfig {
    pub ack: bool,
    #[serde(rename = "self")]
    pub receive_own: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresenceConfig {
    pub key: String,
}

impl JoinPayload {
    pub fn postgres_changes(filters: Vec<ChangeFilter>, access_token: Option<String>) -> Self {
        Self {
            config: JoinConfig {
                broadcast: BroadcastConfig::default(),
                presence: PresenceConfig::default(),
                postgres_changes: filters,
                private: false,
            },
            access_token,
        }
    }
}

/// Payload of a `phx_reply` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyPayload {
    pub status: String,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl ReplyPayload {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Payload of a `postgres_changes` frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePayload {
    pub data: ChangeData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeData {
    pub schema: String,
    pub table: String,
    #[serde(rename = "type")]
    pub change_type: String,
    #[serde(default)]
    pub record: serde_json::Value,
    #[serde(default)]
    pub commit_timestamp: Option<String>,
}
