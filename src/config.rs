use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x400?text=News";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend_url: String,

    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_media_bucket")]
    pub media_bucket: String,

    #[serde(default = "default_placeholder_image")]
    pub placeholder_image: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_media_bucket() -> String {
    "article-images".to_string()
}

fn default_placeholder_image() -> String {
    DEFAULT_PLACEHOLDER_IMAGE.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            anon_key: String::new(),
            media_bucket: default_media_bucket(),
            placeholder_image: default_placeholder_image(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads the file at `path`, writing a default one if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("NEWSROOM_BACKEND_URL").filter(|v| !v.is_empty()) {
            self.backend_url = url;
        }
        if let Some(key) = lookup("NEWSROOM_ANON_KEY").filter(|v| !v.is_empty()) {
            self.anon_key = key;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend_url.trim().is_empty() {
            return Err(AppError::Config(format!(
                "backend_url is not set (edit {} or set NEWSROOM_BACKEND_URL)",
                Self::config_path().display()
            )));
        }
        Url::parse(&self.backend_url)?;
        if self.anon_key.trim().is_empty() {
            return Err(AppError::Config(
                "anon_key is not set (or set NEWSROOM_ANON_KEY)".to_string(),
            ));
        }
        if self.media_bucket.trim().is_empty() {
            return Err(AppError::Config("media_bucket must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("newsroom")
            .join("config.toml")
    }
}
