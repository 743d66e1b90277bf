//! Domain layer: session data and the events that change it.

pub mod conversation_state;
pub mod events;
pub mod message;
pub mod message_input_state;
pub mod session_state;
pub mod shell_state;
pub mod stats;
pub mod status;
