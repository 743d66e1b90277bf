use std::time::{Duration, Instant};

use anyhow::Result;

use crate::domain::{
    events::{AppEvent, KeyInput},
    session_state::SessionState,
    shell_state::ShellState,
};

use super::{
    contracts::{RelayOutbox, ShellOrchestrator},
    send_message::SendMessageError,
    session::SessionController,
};

const SHELL_SEND_DROPPED: &str = "SHELL_SEND_DROPPED";
const SHELL_NEW_CHAT_DROPPED: &str = "SHELL_NEW_CHAT_DROPPED";

/// Routes terminal input and relay events to the session and the input box.
pub struct DefaultShellOrchestrator<O>
where
    O: RelayOutbox,
{
    state: ShellState,
    session: SessionController<O>,
}

impl<O> DefaultShellOrchestrator<O>
where
    O: RelayOutbox,
{
    pub fn new(outbox: O, typing_window: Duration) -> Self {
        Self {
            state: ShellState::default(),
            session: SessionController::new(outbox, typing_window),
        }
    }

    fn handle_event_at(&mut self, event: AppEvent, now: Instant) -> Result<()> {
        match event {
            AppEvent::Tick => {}
            AppEvent::QuitRequested => self.state.stop(),
            AppEvent::InputKey(key) => self.handle_key(key),
            AppEvent::Relay(event) => {
                if let Err(error) = self.session.handle_relay_event(event, now) {
                    tracing::warn!(error = %error, "relay event produced no outbound command");
                }
            }
            AppEvent::ConnectionChanged(status) => {
                tracing::info!(status = status.as_label(), "relay connection status changed");
                self.session.on_connection_status(status);
            }
        }

        self.session.expire_typing(now);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyInput) {
        if key.ctrl {
            match key.key.as_str() {
                "n" => self.request_new_chat(),
                "v" => self.state.toggle_video(),
                "a" => self.state.toggle_audio(),
                _ => {}
            }
            return;
        }

        if key.key == "enter" {
            self.submit_message();
            return;
        }

        let paired = self.session.state().conversation.is_connected();
        let input = self.state.message_input_mut();
        match key.key.as_str() {
            "backspace" => input.delete_char_before(),
            "delete" => input.delete_char_at(),
            "left" => input.move_cursor_left(),
            "right" => input.move_cursor_right(),
            "home" => input.move_cursor_home(),
            "end" => input.move_cursor_end(),
            // The input box is disabled until a partner is paired.
            _ if !paired => {}
            other => {
                let mut chars = other.chars();
                if let (Some(ch), None) = (chars.next(), chars.next()) {
                    input.insert_char(ch);
                }
            }
        }
    }

    fn submit_message(&mut self) {
        let text = self.state.message_input().text().to_owned();

        match self.session.send_message(&text) {
            Ok(()) => self.state.message_input_mut().clear(),
            Err(SendMessageError::EmptyMessage | SendMessageError::NotPaired) => {}
            Err(error @ SendMessageError::TransportClosed) => {
                tracing::warn!(code = SHELL_SEND_DROPPED, error = %error, "message not sent");
            }
        }
    }

    fn request_new_chat(&mut self) {
        self.state.message_input_mut().clear();
        if let Err(error) = self.session.request_new_chat() {
            tracing::warn!(code = SHELL_NEW_CHAT_DROPPED, error = %error, "new chat request not sent");
        }
    }
}

impl<O> ShellOrchestrator for DefaultShellOrchestrator<O>
where
    O: RelayOutbox,
{
    fn state(&self) -> &ShellState {
        &self.state
    }

    fn session(&self) -> &SessionState {
        self.session.state()
    }

    fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        self.handle_event_at(event, Instant::now())
    }
}
