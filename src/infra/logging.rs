use tracing_subscriber::EnvFilter;

use crate::infra::{config::LogConfig, error::AppError, storage_layout::StorageLayout};

/// Routes tracing output to a file so log lines never land on the TUI screen.
pub fn init(config: &LogConfig, layout: &StorageLayout) -> Result<(), AppError> {
    layout.ensure_dirs()?;
    let appender = tracing_appender::rolling::never(&layout.log_dir, &config.file);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level)),
        )
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(AppError::LoggingInit)
}
