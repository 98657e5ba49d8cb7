use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Settings loaded once at startup and handed to the fetcher and the
/// download coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Per-request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of images fetched at the same time (default: 5)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Directory holding the numbered `scrapping<N>` folders (default: "scrap")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrent_downloads: default_max_concurrent(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_concurrent() -> usize {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("scrap")
}

impl ScraperConfig {
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let raw = fs::read_to_string(path).map_err(|source| ScrapeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(ScrapeError::ConfigParse)?;
        config.validate()?;

        debug!("Loaded configuration from {:?}: {:?}", path, config);

        Ok(config)
    }

    /// Like [`ScraperConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ScrapeError> {
        match Self::load(path) {
            Err(ScrapeError::ConfigRead { source, .. }) if source.kind() == ErrorKind::NotFound => {
                warn!("Config file {:?} not found, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.timeout_ms == 0 {
            return Err(ScrapeError::InvalidConfig(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.max_concurrent_downloads == 0 {
            return Err(ScrapeError::InvalidConfig(
                "max_concurrent_downloads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
