//! UI layer: terminal rendering and input.

mod conversation_rendering;
mod event_source;
mod message_input;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub(crate) use event_source::CrosstermEventSource;
