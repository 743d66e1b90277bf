use super::{stats::PopulationStats, status::ConnectionStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    InputKey(KeyInput),
    Relay(RelayEvent),
    ConnectionChanged(ConnectionStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// Inbound notifications from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// Namespace connection acknowledged by the relay.
    Connected,
    PartnerFound,
    PartnerDisconnected,
    Message(String),
    Typing,
    Stats(PopulationStats),
}

/// Outbound intents sent to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayCommand {
    FindPartner,
    Message(String),
}

impl RelayCommand {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::FindPartner => "findPartner",
            Self::Message(_) => "message",
        }
    }
}
