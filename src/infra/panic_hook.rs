use std::{io, panic};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

/// Restores the terminal before the panic message is printed, otherwise the
/// report is swallowed by the alternate screen.
pub fn install_terminal_restore_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        tracing::error!(panic = %panic_info, "randchat panicked");
        default_hook(panic_info);
    }));
}
