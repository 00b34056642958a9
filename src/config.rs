//! Runtime configuration: JSON file first, then `MGJ_*` environment overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::print::PaperSize;
use crate::query::DEFAULT_PAGE_SIZE;

pub const ENV_CATALOG: &str = "MGJ_CATALOG";
pub const ENV_PAGE_SIZE: &str = "MGJ_PAGE_SIZE";
pub const ENV_LOG_JSON: &str = "MGJ_LOG_JSON";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {0}: {1}")]
    InvalidEnv(&'static str, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    /// Catalog JSON file; the built-in listings are used when unset.
    pub catalog_path: Option<PathBuf>,
    pub page_size: usize,
    pub log_json: bool,
    pub paper: PaperSize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            log_json: false,
            paper: PaperSize::A4,
        }
    }
}

impl GalleryConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Applies `MGJ_*` overrides read through `lookup`.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(ENV_CATALOG).filter(|p| !p.trim().is_empty()) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            self.page_size = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidEnv(ENV_PAGE_SIZE, raw))?;
        }
        if let Some(raw) = lookup(ENV_LOG_JSON) {
            self.log_json = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::InvalidEnv(ENV_LOG_JSON, raw)),
            };
        }
        Ok(self)
    }
}
