//! Owned websocket session with the relay.
//!
//! [`RelayConnection::open`] spawns one task on the supplied runtime. The task
//! connects, answers heartbeats, forwards decoded relay events and connection
//! status changes to the UI channel, and reconnects with backoff after a
//! drop. Dropping or closing the [`RelayHandle`] stops it.

use std::{sync::mpsc::Sender, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    runtime::Handle,
    sync::{mpsc, watch},
    time::{sleep_until, timeout, Instant},
};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::{
    domain::{
        events::{AppEvent, RelayCommand, RelayEvent},
        status::ConnectionStatus,
    },
    infra::config::RelayConfig,
    relay::{
        backoff::Backoff,
        events::{encode_command, inbound_event},
        protocol::{self, Packet, ProtocolError, CONNECT_PACKET, PONG_PACKET},
    },
    usecases::contracts::{OutboxError, RelayOutbox},
};

const RELAY_TRANSPORT_OPEN: &str = "RELAY_TRANSPORT_OPEN";
const RELAY_CONNECTED: &str = "RELAY_CONNECTED";
const RELAY_DROPPED: &str = "RELAY_DROPPED";
const RELAY_RECONNECT_SCHEDULED: &str = "RELAY_RECONNECT_SCHEDULED";
const RELAY_FAILED: &str = "RELAY_FAILED";
const RELAY_STOPPED: &str = "RELAY_STOPPED";
const RELAY_MALFORMED_PACKET: &str = "RELAY_MALFORMED_PACKET";
const RELAY_OVERSIZED_PACKET: &str = "RELAY_OVERSIZED_PACKET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub endpoint: Url,
    pub connect_timeout: Duration,
    pub reconnect_initial_delay: Duration,
    pub reconnect_max_delay: Duration,
    pub max_reconnect_attempts: u32,
    pub max_payload_bytes: usize,
}

impl RelaySettings {
    pub fn from_config(config: &RelayConfig) -> Result<Self, ProtocolError> {
        Ok(Self {
            endpoint: protocol::socket_endpoint(&config.url)?,
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            reconnect_initial_delay: Duration::from_millis(config.reconnect_initial_delay_ms),
            reconnect_max_delay: Duration::from_millis(config.reconnect_max_delay_ms),
            max_reconnect_attempts: config.max_reconnect_attempts,
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    fn backoff(&self) -> Backoff {
        Backoff::new(
            self.reconnect_initial_delay,
            self.reconnect_max_delay,
            self.max_reconnect_attempts,
        )
    }
}

pub struct RelayConnection;

/// `wss` relays need a process-wide rustls provider. A second install is a no-op.
fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

impl RelayConnection {
    pub fn open(runtime: &Handle, settings: RelaySettings, events: Sender<AppEvent>) -> RelayHandle {
        install_crypto_provider();

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        tracing::info!(endpoint = %settings.endpoint, "opening relay connection");
        runtime.spawn(run_connection(
            settings,
            StatusNotifier::new(events),
            command_rx,
            stop_rx,
        ));

        RelayHandle {
            commands: command_tx,
            stop_tx: Some(stop_tx),
        }
    }
}

#[derive(Debug)]
pub struct RelayHandle {
    commands: mpsc::UnboundedSender<RelayCommand>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl RelayHandle {
    pub fn outbox(&self) -> RelayOutboxSender {
        RelayOutboxSender {
            commands: self.commands.clone(),
        }
    }

    pub fn close(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            tracing::info!(code = RELAY_STOPPED, "relay connection stop requested");
        }
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.close();
    }
}

/// Cloneable write side of the relay connection.
#[derive(Debug, Clone)]
pub struct RelayOutboxSender {
    commands: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayOutbox for RelayOutboxSender {
    fn emit(&self, command: RelayCommand) -> Result<(), OutboxError> {
        self.commands.send(command).map_err(|_| OutboxError::Closed)
    }
}

struct StatusNotifier {
    events: Sender<AppEvent>,
    last: Option<ConnectionStatus>,
}

impl StatusNotifier {
    fn new(events: Sender<AppEvent>) -> Self {
        Self { events, last: None }
    }

    /// Returns false once the UI side has gone away.
    fn status(&mut self, status: ConnectionStatus) -> bool {
        if self.last == Some(status) {
            return true;
        }
        self.last = Some(status);
        self.events.send(AppEvent::ConnectionChanged(status)).is_ok()
    }

    fn relay(&self, event: RelayEvent) -> bool {
        self.events.send(AppEvent::Relay(event)).is_ok()
    }
}

enum SessionEnd {
    Stopped,
    Dropped { reason: String, established: bool },
}

fn dropped(reason: impl Into<String>, established: bool) -> SessionEnd {
    SessionEnd::Dropped {
        reason: reason.into(),
        established,
    }
}

async fn run_connection(
    settings: RelaySettings,
    mut notifier: StatusNotifier,
    mut commands: mpsc::UnboundedReceiver<RelayCommand>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut backoff = settings.backoff();

    if !notifier.status(ConnectionStatus::Connecting) {
        return;
    }

    loop {
        let reason = match serve_once(&settings, &mut notifier, &mut commands, &mut stop_rx).await {
            SessionEnd::Stopped => {
                tracing::info!(code = RELAY_STOPPED, "relay connection stopped");
                return;
            }
            SessionEnd::Dropped {
                reason,
                established,
            } => {
                if established {
                    backoff.reset();
                }
                reason
            }
        };

        tracing::warn!(code = RELAY_DROPPED, reason = %reason, "relay transport lost");

        let Some(delay) = backoff.next_delay() else {
            tracing::error!(
                code = RELAY_FAILED,
                attempts = backoff.attempt(),
                reason = %reason,
                "relay reconnect attempts exhausted"
            );
            if notifier.status(ConnectionStatus::Failed) {
                idle_until_stopped(&mut commands, &mut stop_rx).await;
            }
            return;
        };

        if !notifier.status(ConnectionStatus::Reconnecting) {
            return;
        }

        tracing::info!(
            code = RELAY_RECONNECT_SCHEDULED,
            attempt = backoff.attempt(),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "relay reconnect scheduled"
        );

        if !wait_or_stop(delay, &mut commands, &mut stop_rx).await {
            return;
        }
    }
}

async fn serve_once(
    settings: &RelaySettings,
    notifier: &mut StatusNotifier,
    commands: &mut mpsc::UnboundedReceiver<RelayCommand>,
    stop_rx: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let connected = tokio::select! {
        _ = wait_for_stop(stop_rx) => return SessionEnd::Stopped,
        result = timeout(settings.connect_timeout, connect_async(settings.endpoint.as_str())) => result,
    };

    let ws = match connected {
        Ok(Ok((ws, _response))) => ws,
        Ok(Err(error)) => return dropped(format!("connect failed: {error}"), false),
        Err(_) => return dropped("connect timed out", false),
    };

    tracing::debug!(code = RELAY_TRANSPORT_OPEN, endpoint = %settings.endpoint, "relay transport open");

    let (mut sink, mut stream) = ws.split();
    // Until the handshake announces the heartbeat, the connect timeout bounds the wait.
    let mut liveness = settings.connect_timeout;
    let mut deadline = Instant::now() + liveness;
    let mut established = false;

    loop {
        tokio::select! {
            _ = wait_for_stop(stop_rx) => {
                let _ = sink.send(Message::Close(None)).await;
                return SessionEnd::Stopped;
            }
            _ = sleep_until(deadline) => {
                return dropped("heartbeat timed out", established);
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    return SessionEnd::Stopped;
                };

                if !established {
                    tracing::debug!(
                        event = command.event_name(),
                        "dropping relay command while not connected"
                    );
                    continue;
                }

                if let Err(error) = sink.send(Message::Text(encode_command(&command).into())).await {
                    return dropped(format!("send failed: {error}"), established);
                }
                tracing::debug!(event = command.event_name(), "relay command sent");
            }
            frame = stream.next() => {
                let text = match frame {
                    None => return dropped("stream ended", established),
                    Some(Err(error)) => return dropped(format!("read failed: {error}"), established),
                    Some(Ok(Message::Close(_))) => return dropped("closed by relay", established),
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(_)) => continue,
                };

                deadline = Instant::now() + liveness;

                if text.as_str().len() > settings.max_payload_bytes {
                    tracing::warn!(
                        code = RELAY_OVERSIZED_PACKET,
                        bytes = text.as_str().len(),
                        limit = settings.max_payload_bytes,
                        "dropping oversized relay packet"
                    );
                    continue;
                }

                let reply = match protocol::decode(text.as_str()) {
                    Ok(Packet::Open(handshake)) => {
                        tracing::debug!(sid = %handshake.sid, "relay handshake received");
                        liveness = handshake.liveness_window();
                        deadline = Instant::now() + liveness;
                        Some(CONNECT_PACKET)
                    }
                    Ok(Packet::Ping) => Some(PONG_PACKET),
                    Ok(Packet::Connect) => {
                        established = true;
                        tracing::info!(code = RELAY_CONNECTED, "relay session connected");
                        if !notifier.status(ConnectionStatus::Connected)
                            || !notifier.relay(RelayEvent::Connected)
                        {
                            return SessionEnd::Stopped;
                        }
                        None
                    }
                    Ok(Packet::Event { name, args }) => {
                        match inbound_event(&name, args) {
                            Ok(Some(event)) => {
                                if !notifier.relay(event) {
                                    return SessionEnd::Stopped;
                                }
                            }
                            Ok(None) => {
                                tracing::debug!(event = %name, "ignoring unknown relay event");
                            }
                            Err(error) => {
                                tracing::warn!(
                                    code = RELAY_MALFORMED_PACKET,
                                    error = %error,
                                    "ignoring malformed relay event"
                                );
                            }
                        }
                        None
                    }
                    Ok(Packet::Close | Packet::Disconnect) => {
                        return dropped("relay ended the session", established);
                    }
                    Ok(Packet::ConnectError(message)) => {
                        return dropped(format!("namespace connect rejected: {message}"), established);
                    }
                    Ok(Packet::Pong | Packet::Noop) => None,
                    Ok(Packet::Unsupported(kind)) => {
                        tracing::debug!(kind = %kind, "ignoring unsupported socket packet");
                        None
                    }
                    Err(error) => {
                        tracing::warn!(
                            code = RELAY_MALFORMED_PACKET,
                            error = %error,
                            "ignoring undecodable relay packet"
                        );
                        None
                    }
                };

                if let Some(reply) = reply {
                    if let Err(error) = sink.send(Message::Text(reply.to_owned().into())).await {
                        return dropped(format!("send failed: {error}"), established);
                    }
                }
            }
        }
    }
}

/// Sleeps for `delay`, discarding commands issued meanwhile. Returns false on stop.
async fn wait_or_stop(
    delay: Duration,
    commands: &mut mpsc::UnboundedReceiver<RelayCommand>,
    stop_rx: &mut watch::Receiver<bool>,
) -> bool {
    let deadline = Instant::now() + delay;

    loop {
        tokio::select! {
            _ = sleep_until(deadline) => return true,
            _ = wait_for_stop(stop_rx) => return false,
            command = commands.recv() => match command {
                Some(command) => tracing::debug!(
                    event = command.event_name(),
                    "dropping relay command while reconnecting"
                ),
                None => return false,
            },
        }
    }
}

async fn idle_until_stopped(
    commands: &mut mpsc::UnboundedReceiver<RelayCommand>,
    stop_rx: &mut watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = wait_for_stop(stop_rx) => return,
            command = commands.recv() => match command {
                Some(command) => tracing::debug!(
                    event = command.event_name(),
                    "dropping relay command after relay failure"
                ),
                None => return,
            },
        }
    }
}

async fn wait_for_stop(stop_rx: &mut watch::Receiver<bool>) {
    loop {
        if *stop_rx.borrow_and_update() {
            return;
        }
        if stop_rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self as std_mpsc, Receiver};

    use tokio::net::{TcpListener, TcpStream};
    use tokio_tungstenite::{accept_async, WebSocketStream};

    use super::*;
    use crate::domain::stats::PopulationStats;

    const OPEN: &str =
        r#"0{"sid":"s1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

    fn settings_for(url: String, max_reconnect_attempts: u32) -> RelaySettings {
        RelaySettings::from_config(&RelayConfig {
            url,
            connect_timeout_ms: 2_000,
            reconnect_initial_delay_ms: 10,
            reconnect_max_delay_ms: 50,
            max_reconnect_attempts,
            max_payload_bytes: 256,
        })
        .expect("test settings must be valid")
    }

    async fn accept(listener: &TcpListener) -> WebSocketStream<TcpStream> {
        let (stream, _) = timeout(Duration::from_secs(5), listener.accept())
            .await
            .expect("client should connect in time")
            .expect("accept should succeed");
        accept_async(stream)
            .await
            .expect("websocket handshake should succeed")
    }

    async fn send(ws: &mut WebSocketStream<TcpStream>, text: &str) {
        ws.send(Message::Text(text.to_owned().into()))
            .await
            .expect("server send should succeed");
    }

    async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> String {
        loop {
            let frame = timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("client frame should arrive in time")
                .expect("client stream should stay open")
                .expect("client frame should be valid");
            if let Message::Text(text) = frame {
                return text.as_str().to_owned();
            }
        }
    }

    /// Handshake plus namespace connect, as a socket.io server does it.
    async fn open_session(ws: &mut WebSocketStream<TcpStream>) {
        send(ws, OPEN).await;
        assert_eq!(next_text(ws).await, "40");
        send(ws, r#"40{"sid":"n1"}"#).await;
    }

    fn recv(rx: &Receiver<AppEvent>) -> AppEvent {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("app event should arrive in time")
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn forwards_relay_events_and_sends_commands() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (events_tx, events_rx) = std_mpsc::channel();

        let mut handle = RelayConnection::open(
            &Handle::current(),
            settings_for(format!("ws://{addr}"), 0),
            events_tx,
        );

        let mut ws = accept(&listener).await;
        open_session(&mut ws).await;

        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connected)
        );
        assert_eq!(recv(&events_rx), AppEvent::Relay(RelayEvent::Connected));

        handle
            .outbox()
            .emit(RelayCommand::FindPartner)
            .expect("outbox should accept command");
        assert_eq!(next_text(&mut ws).await, r#"42["findPartner"]"#);

        send(&mut ws, "2").await;
        assert_eq!(next_text(&mut ws).await, "3");

        send(&mut ws, r#"42["partnerFound"]"#).await;
        send(&mut ws, r#"42["message",5]"#).await;
        send(&mut ws, &format!(r#"42["message","{}"]"#, "x".repeat(300))).await;
        send(&mut ws, r#"42["message","hi"]"#).await;
        send(&mut ws, r#"42["stats",{"onlineUsers":5,"activeChats":2}]"#).await;

        assert_eq!(recv(&events_rx), AppEvent::Relay(RelayEvent::PartnerFound));
        assert_eq!(
            recv(&events_rx),
            AppEvent::Relay(RelayEvent::Message("hi".to_owned()))
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::Relay(RelayEvent::Stats(PopulationStats::new(5, 2)))
        );

        handle
            .outbox()
            .emit(RelayCommand::Message("hello".to_owned()))
            .expect("outbox should accept command");
        assert_eq!(next_text(&mut ws).await, r#"42["message","hello"]"#);

        handle.close();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reconnects_after_transport_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (events_tx, events_rx) = std_mpsc::channel();

        let _handle = RelayConnection::open(
            &Handle::current(),
            settings_for(format!("ws://{addr}"), 0),
            events_tx,
        );

        let mut first = accept(&listener).await;
        open_session(&mut first).await;
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connected)
        );
        assert_eq!(recv(&events_rx), AppEvent::Relay(RelayEvent::Connected));

        drop(first);

        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Reconnecting)
        );

        let mut second = accept(&listener).await;
        open_session(&mut second).await;
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connected)
        );
        assert_eq!(recv(&events_rx), AppEvent::Relay(RelayEvent::Connected));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn reports_failure_when_attempts_are_exhausted() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let (events_tx, events_rx) = std_mpsc::channel();

        let _handle = RelayConnection::open(
            &Handle::current(),
            settings_for(format!("ws://{addr}"), 1),
            events_tx,
        );

        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Reconnecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Failed)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn secure_relay_failure_is_reported_not_panicked() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        // Accepts TCP and hangs up, so every TLS handshake fails.
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });
        let (events_tx, events_rx) = std_mpsc::channel();

        let _handle = RelayConnection::open(
            &Handle::current(),
            settings_for(format!("wss://{addr}"), 1),
            events_tx,
        );

        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Reconnecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Failed)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn silent_relay_is_dropped_after_liveness_window() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let (events_tx, events_rx) = std_mpsc::channel();

        let _handle = RelayConnection::open(
            &Handle::current(),
            settings_for(format!("ws://{addr}"), 0),
            events_tx,
        );

        let mut ws = accept(&listener).await;
        send(
            &mut ws,
            r#"0{"sid":"s2","upgrades":[],"pingInterval":100,"pingTimeout":100}"#,
        )
        .await;
        assert_eq!(next_text(&mut ws).await, "40");
        send(&mut ws, r#"40{"sid":"n2"}"#).await;

        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connecting)
        );
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Connected)
        );
        assert_eq!(recv(&events_rx), AppEvent::Relay(RelayEvent::Connected));

        // No pings follow; the transport must be declared dead, not kept open.
        assert_eq!(
            recv(&events_rx),
            AppEvent::ConnectionChanged(ConnectionStatus::Reconnecting)
        );
        drop(ws);
    }

    #[test]
    fn outbox_reports_closed_channel() {
        let (commands, receiver) = mpsc::unbounded_channel();
        drop(receiver);
        let outbox = RelayOutboxSender { commands };

        assert_eq!(
            outbox.emit(RelayCommand::FindPartner),
            Err(OutboxError::Closed)
        );
    }

    #[test]
    fn settings_derive_websocket_endpoint() {
        let settings = RelaySettings::from_config(&RelayConfig::default()).expect("defaults");

        assert_eq!(settings.endpoint.scheme(), "wss");
        assert_eq!(settings.endpoint.path(), "/socket.io/");
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }
}
