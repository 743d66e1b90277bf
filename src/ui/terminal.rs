use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

const WINDOW_TITLE: &str = "randchat";

type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Raw-mode alternate screen for the chat shell. Dropping it hands the
/// terminal back in its original mode.
pub struct TerminalSession {
    terminal: ChatTerminal,
}

impl TerminalSession {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, SetTitle(WINDOW_TITLE)) {
            let _ = disable_raw_mode();
            return Err(error).context("failed to enter alternate screen");
        }

        let mut terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("failed to attach terminal")?;
        terminal.clear().context("failed to clear terminal")?;

        Ok(Self { terminal })
    }

    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut Frame<'_>),
    {
        self.terminal
            .draw(render)
            .context("failed to draw frame")?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(error) = self.restore() {
            tracing::warn!(error = %error, "failed to restore terminal");
        }
    }
}
