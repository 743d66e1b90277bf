use anyhow::Result;
use thiserror::Error;

use crate::domain::{
    events::{AppEvent, RelayCommand},
    session_state::SessionState,
    shell_state::ShellState,
};

pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

pub trait ShellOrchestrator {
    fn state(&self) -> &ShellState;
    fn session(&self) -> &SessionState;
    fn handle_event(&mut self, event: AppEvent) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OutboxError {
    #[error("relay connection is closed")]
    Closed,
}

/// Write side of the relay connection.
pub trait RelayOutbox {
    fn emit(&self, command: RelayCommand) -> Result<(), OutboxError>;
}

impl<T: RelayOutbox + ?Sized> RelayOutbox for &T {
    fn emit(&self, command: RelayCommand) -> Result<(), OutboxError> {
        (*self).emit(command)
    }
}
