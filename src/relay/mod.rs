//! Relay integration layer: wire codec and the websocket session.

pub mod backoff;
pub mod connection;
pub mod events;
pub mod protocol;

pub use connection::{RelayConnection, RelayHandle, RelaySettings};
