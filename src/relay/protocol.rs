//! Engine.IO v4 / Socket.IO v4 text framing.
//!
//! Only the pieces a websocket-only client on the default namespace needs:
//! the open handshake, heartbeat, namespace connect/disconnect and plain
//! (non-binary, non-ack) events.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Namespace connect request for the default namespace.
pub const CONNECT_PACKET: &str = "40";
/// Heartbeat answer to a server ping.
pub const PONG_PACKET: &str = "3";

const ENGINE_PATH: &str = "/socket.io/";
const ENGINE_QUERY: &str = "EIO=4&transport=websocket";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("empty packet")]
    EmptyPacket,
    #[error("unknown packet type `{0}`")]
    UnknownPacketType(char),
    #[error("invalid open handshake: {0}")]
    InvalidHandshake(#[source] serde_json::Error),
    #[error("invalid event frame: {0}")]
    InvalidEvent(#[source] serde_json::Error),
    #[error("event frame has no name")]
    MissingEventName,
    #[error("invalid `{event}` payload: {details}")]
    InvalidPayload { event: &'static str, details: String },
    #[error("invalid relay url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported relay url scheme `{0}`")]
    UnsupportedScheme(String),
}

/// Parameters announced by the server in the `0{...}` packet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    pub ping_interval: u64,
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

impl Handshake {
    /// Longest silence tolerated before the transport counts as dead.
    pub fn liveness_window(&self) -> Duration {
        Duration::from_millis(self.ping_interval.saturating_add(self.ping_timeout))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Noop,
    Connect,
    Disconnect,
    ConnectError(String),
    Event { name: String, args: Vec<Value> },
    /// Socket.IO packet kinds this client never asks for (acks, binary).
    Unsupported(char),
}

pub fn decode(text: &str) -> Result<Packet, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
    let rest = chars.as_str();

    match kind {
        '0' => serde_json::from_str(rest)
            .map(Packet::Open)
            .map_err(ProtocolError::InvalidHandshake),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_socket_packet(rest),
        '5' | '6' => Ok(Packet::Noop),
        other => Err(ProtocolError::UnknownPacketType(other)),
    }
}

fn decode_socket_packet(text: &str) -> Result<Packet, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::EmptyPacket)?;
    let rest = chars.as_str();

    match kind {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(rest),
        '4' => Ok(Packet::ConnectError(connect_error_message(rest))),
        '3' | '5' | '6' => Ok(Packet::Unsupported(kind)),
        other => Err(ProtocolError::UnknownPacketType(other)),
    }
}

fn decode_event(text: &str) -> Result<Packet, ProtocolError> {
    // An ack id may precede the JSON array; the client never requests acks.
    let body = text.trim_start_matches(|ch: char| ch.is_ascii_digit());
    let mut items: Vec<Value> = serde_json::from_str(body).map_err(ProtocolError::InvalidEvent)?;

    if items.is_empty() {
        return Err(ProtocolError::MissingEventName);
    }

    match items.remove(0) {
        Value::String(name) => Ok(Packet::Event { name, args: items }),
        _ => Err(ProtocolError::MissingEventName),
    }
}

fn connect_error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| text.to_owned())
}

/// Encodes a `42[...]` event frame.
pub fn encode_event(name: &str, args: &[Value]) -> String {
    let mut items = Vec::with_capacity(args.len() + 1);
    items.push(Value::String(name.to_owned()));
    items.extend_from_slice(args);
    format!("42{}", Value::Array(items))
}

/// Maps a configured relay address to its websocket transport endpoint.
pub fn socket_endpoint(relay_url: &str) -> Result<Url, ProtocolError> {
    let mut url = Url::parse(relay_url)?;

    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ProtocolError::UnsupportedScheme(other.to_owned())),
    };

    url.set_scheme(scheme)
        .map_err(|()| ProtocolError::UnsupportedScheme(scheme.to_owned()))?;
    url.set_path(ENGINE_PATH);
    url.set_query(Some(ENGINE_QUERY));

    Ok(url)
}
