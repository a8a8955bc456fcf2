//! Realtime push channel over the hosted websocket service.

use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::{Instant, interval_at};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use wall_core::ports::{ChannelError, PostInserted, PushChannel, Subscription};
use wall_shared::realtime::Frame;

use super::protocol::{self, Inbound, RefCounter};
use crate::config::SupabaseConfig;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketSink = SplitSink<Socket, Message>;
type SocketStream = SplitStream<Socket>;

/// Push channel backed by the realtime websocket.
///
/// Each subscription owns one socket and one background task that forwards
/// inserts, sends heartbeats and leaves the channel on teardown.
pub struct RealtimeChannel {
    config: Arc<SupabaseConfig>,
}

impl RealtimeChannel {
    pub fn new(config: Arc<SupabaseConfig>) -> Self {
        Self { config }
    }
}

async fn send_frame(sink: &mut SocketSink, frame: &Frame) -> Result<(), String> {
    let text = serde_json::to_string(frame).map_err(|e| e.to_string())?;
    sink.send(Message::Text(text)).await.map_err(|e| e.to_string())
}

/// Read frames until the server answers the join identified by `join_ref`.
async fn await_join(
    stream: &mut SocketStream,
    topic: &str,
    table: &str,
    join_ref: &str,
) -> Result<(), ChannelError> {
    while let Some(message) = stream.next().await {
        let message = message.map_err(|e| ChannelError::Connection(e.to_string()))?;
        let Message::Text(text) = message else {
            continue;
        };

        match protocol::decode(&text, topic, table) {
            Ok(Inbound::Reply {
                reference,
                ok,
                response,
            }) if reference.as_deref() == Some(join_ref) => {
                return if ok {
                    Ok(())
                } else {
                    Err(ChannelError::SubscribeError(response.to_string()))
                };
            }
            Ok(Inbound::ChannelError(message)) => {
                return Err(ChannelError::SubscribeError(message));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Undecodable realtime frame"),
        }
    }

    Err(ChannelError::SubscribeError(
        "socket closed before the join was acknowledged".to_string(),
    ))
}

struct SocketTask {
    config: Arc<SupabaseConfig>,
    topic: String,
    refs: RefCounter,
    sink: SocketSink,
    stream: SocketStream,
    events: mpsc::UnboundedSender<PostInserted>,
    leave: oneshot::Receiver<()>,
}

impl SocketTask {
    async fn run(mut self) {
        let period = self.config.heartbeat_interval;
        let mut heartbeat = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = &mut self.leave => {
                    let frame = protocol::leave_frame(&self.topic, &self.refs.next());
                    if let Err(e) = send_frame(&mut self.sink, &frame).await {
                        tracing::debug!(error = %e, "Leave frame not delivered");
                    }
                    let _ = self.sink.close().await;
                    tracing::info!(channel = %self.topic, "Left realtime channel");
                    break;
                }
                _ = heartbeat.tick() => {
                    let frame = protocol::heartbeat_frame(&self.refs.next());
                    if let Err(e) = send_frame(&mut self.sink, &frame).await {
                        tracing::error!(channel = %self.topic, error = %e, "Heartbeat failed");
                        break;
                    }
                }
                message = self.stream.next() => {
                    if !self.handle(message) {
                        break;
                    }
                }
            }
        }
    }

    /// Returns false when the task should stop.
    fn handle(&mut self, message: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>) -> bool {
        let text = match message {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Close(_))) | None => {
                tracing::info!(channel = %self.topic, "Realtime socket closed");
                return false;
            }
            Some(Ok(_)) => return true,
            Some(Err(e)) => {
                tracing::error!(channel = %self.topic, error = %e, "Realtime socket error");
                return false;
            }
        };

        match protocol::decode(&text, &self.topic, &self.config.table) {
            Ok(Inbound::Insert(record)) => {
                let event = PostInserted {
                    channel: self.topic.clone(),
                    record,
                };
                // Receiver gone means the subscription was dropped.
                self.events.unbounded_send(event).is_ok()
            }
            Ok(Inbound::Reply { ok: false, response, .. }) => {
                tracing::warn!(channel = %self.topic, response = %response, "Realtime request refused");
                true
            }
            Ok(Inbound::ChannelError(message)) => {
                tracing::error!(channel = %self.topic, error = %message, "Realtime channel error");
                true
            }
            Ok(Inbound::Closed) => {
                tracing::info!(channel = %self.topic, "Realtime channel closed by server");
                false
            }
            Ok(Inbound::Reply { .. } | Inbound::Ignored) => true,
            Err(e) => {
                tracing::warn!(channel = %self.topic, error = %e, "Undecodable realtime frame");
                true
            }
        }
    }
}

#[async_trait]
impl PushChannel for RealtimeChannel {
    async fn subscribe(&self, channel: &str) -> Result<Subscription, ChannelError> {
        let url = self
            .config
            .realtime_url()
            .map_err(ChannelError::Connection)?;

        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| ChannelError::Connection(e.to_string()))?;
        let (mut sink, mut stream) = socket.split();

        let topic = channel.to_string();
        let mut refs = RefCounter::default();
        let join_ref = refs.next();

        send_frame(&mut sink, &protocol::join_frame(&topic, &self.config, &join_ref))
            .await
            .map_err(ChannelError::Connection)?;
        await_join(&mut stream, &topic, &self.config.table, &join_ref).await?;

        tracing::info!(channel = %topic, table = %self.config.table, "Joined realtime channel");

        let (events_tx, events_rx) = mpsc::unbounded();
        let (leave_tx, leave_rx) = oneshot::channel();

        let task = SocketTask {
            config: self.config.clone(),
            topic: topic.clone(),
            refs,
            sink,
            stream,
            events: events_tx,
            leave: leave_rx,
        };
        tokio::spawn(task.run());

        Ok(Subscription::new(topic, events_rx.boxed(), move || {
            let _ = leave_tx.send(());
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use tokio_tungstenite::accept_async;
    use wall_shared::realtime::{EVENT_HEARTBEAT, EVENT_JOIN, EVENT_LEAVE, HEARTBEAT_TOPIC};

    const TOPIC: &str = "realtime:posts";

    type ServerSocket = WebSocketStream<TcpStream>;

    async fn local_server() -> (TcpListener, Arc<SupabaseConfig>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut config = SupabaseConfig::new(format!("http://{addr}"), "anon-key");
        config.heartbeat_interval = Duration::from_millis(20);
        (listener, Arc::new(config))
    }

    async fn accept(listener: &TcpListener) -> ServerSocket {
        let (tcp, _) = listener.accept().await.unwrap();
        accept_async(tcp).await.unwrap()
    }

    async fn read_frame(ws: &mut ServerSocket) -> Option<Frame> {
        while let Some(message) = ws.next().await {
            match message.ok()? {
                Message::Text(text) => return Some(serde_json::from_str(&text).unwrap()),
                Message::Close(_) => return None,
                _ => continue,
            }
        }
        None
    }

    async fn reply(ws: &mut ServerSocket, join: &Frame, status: &str) {
        let frame = json!({
            "topic": join.topic,
            "event": "phx_reply",
            "ref": join.reference,
            "join_ref": join.reference,
            "payload": {"status": status, "response": {}}
        });
        ws.send(Message::Text(frame.to_string())).await.unwrap();
    }

    #[tokio::test]
    async fn test_join_forward_heartbeat_and_leave() {
        let (listener, config) = local_server().await;

        let server = tokio::spawn(async move {
            let mut ws = accept(&listener).await;

            let join = read_frame(&mut ws).await.expect("join frame");
            assert_eq!(join.event, EVENT_JOIN);
            assert_eq!(join.topic, TOPIC);
            reply(&mut ws, &join, "ok").await;

            let insert = json!({
                "topic": TOPIC,
                "event": "postgres_changes",
                "ref": null,
                "payload": {"data": {
                    "schema": "public",
                    "table": "posts",
                    "type": "INSERT",
                    "commit_timestamp": "2024-05-01T12:00:00Z",
                    "record": {
                        "id": 7,
                        "body": "over the wire",
                        "image_url": null,
                        "created_at": "2024-05-01T12:00:00+00:00"
                    }
                }}
            });
            ws.send(Message::Text(insert.to_string())).await.unwrap();

            let mut seen = Vec::new();
            while let Some(frame) = read_frame(&mut ws).await {
                let leaving = frame.event == EVENT_LEAVE;
                seen.push(frame);
                if leaving {
                    break;
                }
            }
            seen
        });

        let channel = RealtimeChannel::new(config);
        let mut sub = channel.subscribe(TOPIC).await.expect("join acknowledged");

        let event = sub.next().await.expect("insert forwarded");
        assert_eq!(event.channel, TOPIC);
        assert_eq!(event.record.id.as_str(), "7");
        assert_eq!(event.record.body, "over the wire");

        tokio::time::sleep(Duration::from_millis(100)).await;
        sub.unsubscribe();

        let seen = tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .expect("server finished")
            .unwrap();

        assert!(
            seen.iter()
                .any(|f| f.topic == HEARTBEAT_TOPIC && f.event == EVENT_HEARTBEAT)
        );
        let last = seen.last().expect("frames after join");
        assert_eq!(last.event, EVENT_LEAVE);
        assert_eq!(last.topic, TOPIC);
        assert_eq!(last.payload, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn test_refused_join_is_a_subscribe_error() {
        let (listener, config) = local_server().await;

        tokio::spawn(async move {
            let mut ws = accept(&listener).await;
            let join = read_frame(&mut ws).await.expect("join frame");
            reply(&mut ws, &join, "error").await;
            // Keep the socket open until the client gives up.
            while read_frame(&mut ws).await.is_some() {}
        });

        let result = RealtimeChannel::new(config).subscribe(TOPIC).await;
        assert!(matches!(result, Err(ChannelError::SubscribeError(_))));
    }
}
