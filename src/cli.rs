use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "randchat", about = "Talk to strangers from the terminal")]
pub struct Cli {
    /// Path to config file (default: ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Relay address, overriding `relay.url` from the config file
    #[arg(long, global = true)]
    pub relay_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the chat TUI
    Run,
    /// Print the effective configuration and exit
    CheckConfig,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn defaults_to_run_when_command_is_missing() {
        let cli = Cli::parse_from(["randchat"]);

        assert!(matches!(cli.command_or_default(), Command::Run));
        assert!(cli.relay_url.is_none());
    }

    #[test]
    fn parses_relay_override_and_config_path() {
        let cli = Cli::parse_from([
            "randchat",
            "run",
            "--config",
            "custom.toml",
            "--relay-url",
            "ws://localhost:3000",
        ]);

        assert!(matches!(cli.command_or_default(), Command::Run));
        assert_eq!(
            cli.config
                .as_deref()
                .map(|p| p.to_string_lossy().to_string()),
            Some("custom.toml".to_owned())
        );
        assert_eq!(cli.relay_url.as_deref(), Some("ws://localhost:3000"));
    }

    #[test]
    fn parses_check_config_command() {
        let cli = Cli::parse_from(["randchat", "check-config"]);

        assert!(matches!(cli.command_or_default(), Command::CheckConfig));
    }
}
