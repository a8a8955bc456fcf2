//! Frame codec for the realtime socket.

use serde_json::Value;

use wall_core::domain::Post;
use wall_shared::realtime::{
    ChangeFilter, ChangePayload, EVENT_CLOSE, EVENT_ERROR, EVENT_HEARTBEAT, EVENT_JOIN,
    EVENT_LEAVE, EVENT_POSTGRES_CHANGES, EVENT_REPLY, EVENT_SYSTEM, Frame, HEARTBEAT_TOPIC,
    JoinPayload, ReplyPayload,
};

use crate::config::SupabaseConfig;

const INSERT: &str = "INSERT";

/// A decoded inbound frame, reduced to what the socket task acts on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Inbound {
    Insert(Post),
    Reply {
        reference: Option<String>,
        ok: bool,
        response: Value,
    },
    ChannelError(String),
    Closed,
    Ignored,
}

/// Monotonic frame refs, rendered as decimal strings.
#[derive(Debug, Default)]
pub(crate) struct RefCounter(u64);

impl RefCounter {
    pub(crate) fn next(&mut self) -> String {
        self.0 += 1;
        self.0.to_string()
    }
}

pub(crate) fn join_frame(topic: &str, config: &SupabaseConfig, reference: &str) -> Frame {
    let payload = JoinPayload::postgres_changes(
        vec![ChangeFilter {
            event: INSERT.to_string(),
            schema: config.schema.clone(),
            table: config.table.clone(),
        }],
        Some(config.anon_key.clone()),
    );
    // JoinPayload only holds strings and bools, serialization cannot fail.
    let payload = serde_json::to_value(payload).unwrap_or_default();

    let mut frame = Frame::new(topic, EVENT_JOIN, payload, reference);
    frame.join_ref = Some(reference.to_string());
    frame
}

pub(crate) fn leave_frame(topic: &str, reference: &str) -> Frame {
    Frame::new(topic, EVENT_LEAVE, Value::Object(Default::default()), reference)
}

pub(crate) fn heartbeat_frame(reference: &str) -> Frame {
    Frame::new(
        HEARTBEAT_TOPIC,
        EVENT_HEARTBEAT,
        Value::Object(Default::default()),
        reference,
    )
}

/// Decode one text frame received on `topic`, keeping inserts into `table`.
pub(crate) fn decode(text: &str, topic: &str, table: &str) -> Result<Inbound, String> {
    let frame: Frame = serde_json::from_str(text).map_err(|e| e.to_string())?;

    if frame.topic != topic && frame.topic != HEARTBEAT_TOPIC {
        return Ok(Inbound::Ignored);
    }

    match frame.event.as_str() {
        EVENT_POSTGRES_CHANGES => {
            let change: ChangePayload =
                serde_json::from_value(frame.payload).map_err(|e| e.to_string())?;
            let data = change.data;
            if data.change_type != INSERT || data.table != table {
                return Ok(Inbound::Ignored);
            }
            let post: Post = serde_json::from_value(data.record).map_err(|e| e.to_string())?;
            Ok(Inbound::Insert(post))
        }
        EVENT_REPLY => {
            let reply: ReplyPayload =
                serde_json::from_value(frame.payload).map_err(|e| e.to_string())?;
            Ok(Inbound::Reply {
                reference: frame.reference,
                ok: reply.is_ok(),
                response: reply.response,
            })
        }
        EVENT_SYSTEM => {
            let status = frame.payload.get("status").and_then(Value::as_str);
            if status == Some("error") {
                let message = frame
                    .payload
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown system error");
                Ok(Inbound::ChannelError(message.to_string()))
            } else {
                Ok(Inbound::Ignored)
            }
        }
        EVENT_ERROR => Ok(Inbound::ChannelError(format!("channel {topic} errored"))),
        EVENT_CLOSE => Ok(Inbound::Closed),
        _ => Ok(Inbound::Ignored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOPIC: &str = "realtime:posts";

    fn insert_frame(table: &str, change_type: &str) -> String {
        json!({
            "topic": TOPIC,
            "event": "postgres_changes",
            "ref": null,
            "payload": {
                "ids": [51093028],
                "data": {
                    "columns": [{"name": "id", "type": "uuid"}],
                    "commit_timestamp": "2024-05-01T12:00:00.412Z",
                    "errors": null,
                    "record": {
                        "id": "5b2f3c1d-4a3e-4d9f-8a0b-6c7d8e9f0a1b",
                        "body": "live!",
                        "image_url": null,
                        "created_at": "2024-05-01T12:00:00.401813+00:00"
                    },
                    "schema": "public",
                    "table": table,
                    "type": change_type
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_decode_insert() {
        let inbound = decode(&insert_frame("posts", "INSERT"), TOPIC, "posts").unwrap();
        let Inbound::Insert(post) = inbound else {
            panic!("expected insert, got {inbound:?}");
        };
        assert_eq!(post.body, "live!");
        assert_eq!(post.id.as_str(), "5b2f3c1d-4a3e-4d9f-8a0b-6c7d8e9f0a1b");
    }

    #[test]
    fn test_other_tables_and_events_ignored() {
        assert_eq!(
            decode(&insert_frame("comments", "INSERT"), TOPIC, "posts").unwrap(),
            Inbound::Ignored
        );
        assert_eq!(
            decode(&insert_frame("posts", "UPDATE"), TOPIC, "posts").unwrap(),
            Inbound::Ignored
        );
        assert_eq!(
            decode(&insert_frame("posts", "INSERT"), "realtime:other", "posts").unwrap(),
            Inbound::Ignored
        );
    }

    #[test]
    fn test_decode_join_reply() {
        let text = json!({
            "topic": TOPIC,
            "event": "phx_reply",
            "ref": "1",
            "payload": {"status": "ok", "response": {"postgres_changes": [{"id": 1}]}}
        })
        .to_string();

        let Inbound::Reply { reference, ok, .. } = decode(&text, TOPIC, "posts").unwrap() else {
            panic!("expected reply");
        };
        assert_eq!(reference.as_deref(), Some("1"));
        assert!(ok);
    }

    #[test]
    fn test_decode_system_error() {
        let text = json!({
            "topic": TOPIC,
            "event": "system",
            "ref": null,
            "payload": {"status": "error", "message": "Unable to subscribe to changes", "extension": "postgres_changes"}
        })
        .to_string();

        assert_eq!(
            decode(&text, TOPIC, "posts").unwrap(),
            Inbound::ChannelError("Unable to subscribe to changes".into())
        );
    }

    #[test]
    fn test_malformed_frame_is_an_error() {
        assert!(decode("not json", TOPIC, "posts").is_err());
    }

    #[test]
    fn test_join_frame_carries_filter_and_token() {
        let config = SupabaseConfig::new("https://demo.supabase.co", "anon-key");
        let frame = join_frame(TOPIC, &config, "1");

        assert_eq!(frame.event, "phx_join");
        assert_eq!(frame.join_ref.as_deref(), Some("1"));
        assert_eq!(
            frame.payload["config"]["postgres_changes"],
            json!([{"event": "INSERT", "schema": "public", "table": "posts"}])
        );
        assert_eq!(frame.payload["access_token"], "anon-key");
    }

    #[test]
    fn test_refs_increase() {
        let mut refs = RefCounter::default();
        assert_eq!(refs.next(), "1");
        assert_eq!(refs.next(), "2");
    }
}
