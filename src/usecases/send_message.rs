//! Outgoing chat text validation and transmission.

use thiserror::Error;

use crate::domain::events::RelayCommand;

use super::contracts::{OutboxError, RelayOutbox};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// Text is empty after trimming whitespace.
    #[error("message is empty")]
    EmptyMessage,
    /// No partner is paired.
    #[error("no chat partner is connected")]
    NotPaired,
    #[error("relay connection is closed")]
    TransportClosed,
}

impl From<OutboxError> for SendMessageError {
    fn from(error: OutboxError) -> Self {
        match error {
            OutboxError::Closed => Self::TransportClosed,
        }
    }
}

/// Transmits `text` as an outbound chat message.
///
/// The text goes out exactly as typed; trimming only decides whether there is
/// anything to send.
pub fn send_message(
    outbox: &dyn RelayOutbox,
    paired: bool,
    text: &str,
) -> Result<(), SendMessageError> {
    if text.trim().is_empty() {
        return Err(SendMessageError::EmptyMessage);
    }

    if !paired {
        return Err(SendMessageError::NotPaired);
    }

    outbox.emit(RelayCommand::Message(text.to_owned()))?;
    Ok(())
}
