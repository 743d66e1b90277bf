use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, validate, AppConfig},
    contracts::ConfigAdapter,
};

/// Loads the TOML file, applies command-line overrides, then validates.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    relay_url: Option<String>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            relay_url: None,
        }
    }

    pub fn with_relay_url(mut self, relay_url: Option<String>) -> Self {
        self.relay_url = relay_url;
        self
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;

        if let Some(url) = &self.relay_url {
            config.relay.url = url.clone();
        }

        validate(&config)?;
        Ok(config)
    }
}
