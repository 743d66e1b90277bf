use std::cell::RefCell;

use crate::{
    domain::events::RelayCommand,
    usecases::contracts::{OutboxError, RelayOutbox},
};

/// Outbox that records every command instead of transmitting it.
#[derive(Debug, Default)]
pub struct RecordingOutbox {
    sent: RefCell<Vec<RelayCommand>>,
    closed: bool,
}

impl RecordingOutbox {
    pub fn closed() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            closed: true,
        }
    }

    pub fn sent(&self) -> Vec<RelayCommand> {
        self.sent.borrow().clone()
    }
}

impl RelayOutbox for RecordingOutbox {
    fn emit(&self, command: RelayCommand) -> Result<(), OutboxError> {
        if self.closed {
            return Err(OutboxError::Closed);
        }
        self.sent.borrow_mut().push(command);
        Ok(())
    }
}
