//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a single JSON document.  A missing file
//! means "use defaults"; anything present is validated before it is
//! returned or written.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::SamplerConfig;

/// Config stored as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SamplerConfig, ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", self.path.display());
                return Ok(SamplerConfig::default());
            }
            Err(e) => {
                warn!("Config read failed ({}): {}", self.path.display(), e);
                return Err(ConfigError::IoError);
            }
        };

        let config: SamplerConfig = serde_json::from_str(&text).map_err(|e| {
            warn!("Config parse failed ({}): {}", self.path.display(), e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        info!("Config loaded from {}", self.path.display());
        Ok(config)
    }

    fn save(&self, config: &SamplerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let text = serde_json::to_string_pretty(config).map_err(|_| ConfigError::Corrupted)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("Config write failed ({}): {}", self.path.display(), e);
            ConfigError::IoError
        })
    }
}
