use serde::Deserialize;

use crate::infra::config::{AppConfig, LogConfig, RelayConfig, SessionConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub relay: Option<FileRelayConfig>,
    pub session: Option<FileSessionConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(relay) = self.relay {
            relay.merge_into(&mut config.relay);
        }

        if let Some(session) = self.session {
            session.merge_into(&mut config.session);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }

        if let Some(file) = self.file {
            config.file = file;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileRelayConfig {
    pub url: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub reconnect_initial_delay_ms: Option<u64>,
    pub reconnect_max_delay_ms: Option<u64>,
    pub max_reconnect_attempts: Option<u32>,
    pub max_payload_bytes: Option<usize>,
}

impl FileRelayConfig {
    fn merge_into(self, config: &mut RelayConfig) {
        if let Some(url) = self.url {
            config.url = url;
        }

        if let Some(timeout_ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = timeout_ms;
        }

        if let Some(delay_ms) = self.reconnect_initial_delay_ms {
            config.reconnect_initial_delay_ms = delay_ms;
        }

        if let Some(delay_ms) = self.reconnect_max_delay_ms {
            config.reconnect_max_delay_ms = delay_ms;
        }

        if let Some(attempts) = self.max_reconnect_attempts {
            config.max_reconnect_attempts = attempts;
        }

        if let Some(bytes) = self.max_payload_bytes {
            config.max_payload_bytes = bytes;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSessionConfig {
    pub typing_indicator_ms: Option<u64>,
}

impl FileSessionConfig {
    fn merge_into(self, config: &mut SessionConfig) {
        if let Some(window_ms) = self.typing_indicator_ms {
            config.typing_indicator_ms = window_ms;
        }
    }
}
