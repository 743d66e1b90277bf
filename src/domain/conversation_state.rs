//! Pairing flag, typing indicator and message history for one session.

use std::time::Instant;

use super::message::Message;

/// Conversation as seen by the local user.
///
/// `history` is append-only and kept in arrival order. It is only ever
/// emptied as a whole, by [`ConversationState::reset_history`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationState {
    connected: bool,
    typing_until: Option<Instant>,
    history: Vec<Message>,
}

impl ConversationState {
    /// Whether a chat partner is currently paired.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn typing_indicator(&self) -> bool {
        self.typing_until.is_some()
    }

    /// Schedules the indicator to clear at `deadline`, replacing any pending clear.
    pub fn show_typing_until(&mut self, deadline: Instant) {
        self.typing_until = Some(deadline);
    }

    pub fn clear_typing(&mut self) {
        self.typing_until = None;
    }

    /// Clears the indicator if its deadline has been reached. Returns true on change.
    pub fn expire_typing(&mut self, now: Instant) -> bool {
        match self.typing_until {
            Some(deadline) if now >= deadline => {
                self.typing_until = None;
                true
            }
            _ => false,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn push(&mut self, message: Message) {
        self.history.push(message);
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }
}
