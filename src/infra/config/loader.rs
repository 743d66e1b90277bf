use std::{
    fs,
    path::{Path, PathBuf},
};

use url::Url;

use crate::infra::{
    config::{file_config::FileConfig, AppConfig},
    error::AppError,
};

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const RELAY_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

pub fn load(path: Option<&Path>) -> Result<AppConfig, AppError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = AppConfig::default();

    if !config_path.exists() {
        return Ok(config);
    }

    let raw = fs::read_to_string(&config_path).map_err(|source| AppError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;

    let file_config: FileConfig = toml::from_str(&raw).map_err(|source| AppError::ConfigParse {
        path: config_path,
        source,
    })?;

    file_config.merge_into(&mut config);
    Ok(config)
}

/// Rejects values that would leave the session unable to run.
pub fn validate(config: &AppConfig) -> Result<(), AppError> {
    let url = Url::parse(&config.relay.url).map_err(|error| AppError::ConfigInvalid {
        field: "relay.url",
        details: error.to_string(),
    })?;

    if !RELAY_SCHEMES.contains(&url.scheme()) {
        return Err(AppError::ConfigInvalid {
            field: "relay.url",
            details: format!("unsupported scheme `{}`", url.scheme()),
        });
    }

    if config.session.typing_indicator_ms == 0 {
        return Err(AppError::ConfigInvalid {
            field: "session.typing_indicator_ms",
            details: "must be greater than zero".to_owned(),
        });
    }

    if config.relay.connect_timeout_ms == 0 {
        return Err(AppError::ConfigInvalid {
            field: "relay.connect_timeout_ms",
            details: "must be greater than zero".to_owned(),
        });
    }

    if config.relay.max_payload_bytes == 0 {
        return Err(AppError::ConfigInvalid {
            field: "relay.max_payload_bytes",
            details: "must be greater than zero".to_owned(),
        });
    }

    if config.relay.reconnect_initial_delay_ms > config.relay.reconnect_max_delay_ms {
        return Err(AppError::ConfigInvalid {
            field: "relay.reconnect_initial_delay_ms",
            details: "must not exceed relay.reconnect_max_delay_ms".to_owned(),
        });
    }

    Ok(())
}
