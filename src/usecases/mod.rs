//! Use case layer: session control and shell orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod send_message;
pub mod session;
pub mod shell;
