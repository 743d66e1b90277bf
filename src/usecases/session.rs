//! Session controller: the single owner of conversation state.
//!
//! Inbound relay events and user intents are applied one at a time, each to
//! completion. Time is passed in explicitly so the typing window can be driven
//! by the UI tick.

use std::time::{Duration, Instant};

use crate::domain::{
    events::{RelayCommand, RelayEvent},
    message::Message,
    session_state::SessionState,
    status::ConnectionStatus,
};

use super::{
    contracts::{OutboxError, RelayOutbox},
    send_message::{send_message, SendMessageError},
};

pub struct SessionController<O>
where
    O: RelayOutbox,
{
    state: SessionState,
    outbox: O,
    typing_window: Duration,
}

impl<O> SessionController<O>
where
    O: RelayOutbox,
{
    pub fn new(outbox: O, typing_window: Duration) -> Self {
        Self {
            state: SessionState::default(),
            outbox,
            typing_window,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sends chat text to the partner and records it locally.
    ///
    /// Empty text or a missing partner leave the state untouched and
    /// transmit nothing.
    pub fn send_message(&mut self, text: &str) -> Result<(), SendMessageError> {
        send_message(&self.outbox, self.state.conversation.is_connected(), text)?;
        self.state.conversation.push(Message::own(text));
        Ok(())
    }

    /// Abandons the current partner (if any) and asks the relay for a new one.
    pub fn request_new_chat(&mut self) -> Result<(), OutboxError> {
        let conversation = &mut self.state.conversation;
        conversation.reset_history();
        conversation.set_connected(false);
        conversation.clear_typing();

        tracing::info!("new chat requested");
        self.outbox.emit(RelayCommand::FindPartner)
    }

    pub fn handle_relay_event(&mut self, event: RelayEvent, now: Instant) -> Result<(), OutboxError> {
        let conversation = &mut self.state.conversation;

        match event {
            RelayEvent::Connected => {
                tracing::debug!("relay connected, searching for a partner");
                self.outbox.emit(RelayCommand::FindPartner)?;
            }
            RelayEvent::PartnerFound => {
                tracing::info!("partner found");
                conversation.set_connected(true);
                conversation.reset_history();
                conversation.clear_typing();
            }
            RelayEvent::PartnerDisconnected => {
                tracing::info!("partner disconnected");
                conversation.set_connected(false);
                conversation.clear_typing();
                conversation.push(Message::partner_disconnected());
            }
            RelayEvent::Message(text) => {
                tracing::debug!(chars = text.chars().count(), "message received");
                conversation.push(Message::partner(text));
            }
            RelayEvent::Typing => {
                conversation.show_typing_until(now + self.typing_window);
            }
            RelayEvent::Stats(stats) => {
                tracing::trace!(
                    online_users = stats.online_users,
                    active_chats = stats.active_chats,
                    "stats received"
                );
                self.state.stats = stats;
            }
        }

        Ok(())
    }

    /// Tracks transport health. Losing the transport also loses the pairing;
    /// history is kept.
    pub fn on_connection_status(&mut self, status: ConnectionStatus) {
        self.state.connection = status;

        if status.is_connected() {
            return;
        }

        let conversation = &mut self.state.conversation;
        if conversation.is_connected() {
            tracing::info!(
                status = status.as_label(),
                "pairing dropped with relay transport"
            );
        }
        conversation.set_connected(false);
        conversation.clear_typing();
    }

    /// Applies a pending typing-indicator clear. Returns true on change.
    pub fn expire_typing(&mut self, now: Instant) -> bool {
        self.state.conversation.expire_typing(now)
    }
}
