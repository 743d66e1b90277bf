use anyhow::{Context, Result};

use crate::{
    cli::{Cli, Command},
    infra::{config::FileConfigAdapter, contracts::ConfigAdapter},
    ui,
    usecases::bootstrap,
};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap::bootstrap(cli.config.as_deref(), cli.relay_url.clone())?;
            let runtime = bootstrap::start_runtime()?;
            let mut shell = bootstrap::compose_shell(&context, runtime.handle())?;

            let outcome = ui::shell::start(
                &context,
                shell.event_source.as_mut(),
                shell.orchestrator.as_mut(),
            );

            shell.relay.close();
            tracing::info!("TUI shell stopped");
            outcome?;
        }
        Command::CheckConfig => {
            let adapter =
                FileConfigAdapter::new(cli.config.as_deref()).with_relay_url(cli.relay_url.clone());
            println!("{}", render_config(&adapter)?);
        }
    }

    Ok(())
}

fn render_config(adapter: &dyn ConfigAdapter) -> Result<String> {
    let config = adapter.load()?;
    toml::to_string_pretty(&config).context("failed to render config as TOML")
}
