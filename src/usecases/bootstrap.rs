use std::{path::Path, sync::mpsc, time::Duration};

use tokio::runtime::{self, Handle, Runtime};

use crate::{
    infra::{
        self,
        config::FileConfigAdapter,
        contracts::ConfigAdapter,
        error::AppError,
        storage_layout::StorageLayout,
    },
    relay::{RelayConnection, RelayHandle, RelaySettings},
    ui::CrosstermEventSource,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

const RELAY_RUNTIME_THREADS: usize = 1;

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
    pub relay: RelayHandle,
}

pub fn bootstrap(config_path: Option<&Path>, relay_url: Option<String>) -> Result<AppContext, AppError> {
    let adapter = FileConfigAdapter::new(config_path).with_relay_url(relay_url);
    let context = build_context(&adapter)?;

    let layout = StorageLayout::resolve()?;
    infra::logging::init(&context.config.logging, &layout)?;

    Ok(context)
}

pub fn build_context(adapter: &dyn ConfigAdapter) -> Result<AppContext, AppError> {
    let config = adapter.load().map_err(AppError::Other)?;

    Ok(AppContext::new(config))
}

/// Runtime that hosts the relay connection task; the UI loop stays on the main thread.
pub fn start_runtime() -> Result<Runtime, AppError> {
    runtime::Builder::new_multi_thread()
        .worker_threads(RELAY_RUNTIME_THREADS)
        .thread_name("randchat-relay")
        .enable_all()
        .build()
        .map_err(AppError::RuntimeStart)
}

pub fn compose_shell(context: &AppContext, runtime: &Handle) -> Result<ShellComposition, AppError> {
    let settings =
        RelaySettings::from_config(&context.config.relay).map_err(|error| AppError::ConfigInvalid {
            field: "relay.url",
            details: error.to_string(),
        })?;

    let (events_tx, events_rx) = mpsc::channel();
    let relay = RelayConnection::open(runtime, settings, events_tx);
    let orchestrator = DefaultShellOrchestrator::new(
        relay.outbox(),
        Duration::from_millis(context.config.session.typing_indicator_ms),
    );

    Ok(ShellComposition {
        event_source: Box::new(CrosstermEventSource::new(events_rx)),
        orchestrator: Box::new(orchestrator),
        relay,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{config::AppConfig, stubs::StubConfigAdapter};

    #[test]
    fn builds_context_with_default_config_when_file_is_missing() {
        let adapter = FileConfigAdapter::new(Some(Path::new("./missing-config.toml")));
        let context = build_context(&adapter).expect("context should build from defaults");

        assert_eq!(context.config, AppConfig::default());
    }

    #[test]
    fn builds_context_from_any_config_adapter() {
        let mut config = AppConfig::default();
        config.session.typing_indicator_ms = 250;
        let adapter = StubConfigAdapter { config };

        let context = build_context(&adapter).expect("context should build");

        assert_eq!(context.config.session.typing_indicator_ms, 250);
    }

    #[test]
    fn composed_shell_starts_running_and_searching() {
        let runtime = start_runtime().expect("runtime should start");
        let mut config = AppConfig::default();
        config.relay.url = "ws://127.0.0.1:9".to_owned();
        config.relay.max_reconnect_attempts = 1;
        let context = AppContext::new(config);

        let mut shell =
            compose_shell(&context, runtime.handle()).expect("shell should compose");

        assert!(shell.orchestrator.state().is_running());
        assert!(!shell.orchestrator.session().conversation.is_connected());
        shell.relay.close();
    }

    #[test]
    fn compose_rejects_unusable_relay_url() {
        let runtime = start_runtime().expect("runtime should start");
        let mut config = AppConfig::default();
        config.relay.url = "mailto:someone@example.com".to_owned();

        let result = compose_shell(&AppContext::new(config), runtime.handle());

        assert!(matches!(
            result,
            Err(AppError::ConfigInvalid {
                field: "relay.url",
                ..
            })
        ));
    }
}
