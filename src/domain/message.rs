/// Text of the synthetic entry appended when the partner leaves.
pub const PARTNER_DISCONNECTED_NOTICE: &str = "Your partner has disconnected.";

/// A single chat line. Never mutated once it lands in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    /// True when the local user authored the message.
    pub is_self: bool,
}

impl Message {
    pub fn own(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_self: true,
        }
    }

    pub fn partner(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_self: false,
        }
    }

    pub fn partner_disconnected() -> Self {
        Self::partner(PARTNER_DISCONNECTED_NOTICE)
    }
}
