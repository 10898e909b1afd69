use std::path::{Path, PathBuf};

use btp_catalog::CrawlOptions;
use btp_catalog::target::{DEFAULT_MAX_CONTENT_BYTES, DEFAULT_MAX_FILES};
use log::warn;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Every field is optional in the file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output path of the `merge` command.
    pub merged_output: PathBuf,
    /// Output path of the `services` command.
    pub catalog_output: PathBuf,
    pub max_files: usize,
    pub max_content_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            merged_output: PathBuf::from("merged.json"),
            catalog_output: PathBuf::from("catalog.json"),
            max_files: DEFAULT_MAX_FILES,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }
}

impl AppConfig {
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_files: self.max_files,
            max_content_bytes: self.max_content_bytes,
        }
    }
}

/// Config file path: `~/.config/btp-catalog/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("btp-catalog").join("config.toml"))
}

/// Load config from `explicit` or the default location, falling back to
/// defaults if the file is missing or unreadable.
pub fn load_config(explicit: Option<&Path>) -> AppConfig {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => p,
            None => return AppConfig::default(),
        },
    };

    let Ok(contents) = std::fs::read_to_string(&path) else {
        if explicit.is_some() {
            warn!("config file {} not readable, using defaults", path.display());
        }
        return AppConfig::default();
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "failed to parse config at {}, using defaults: {e}",
                path.display()
            );
            AppConfig::default()
        }
    }
}
