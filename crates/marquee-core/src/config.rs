use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::MarqueeError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub backend: BackendConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub session_cookie: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub region: String,
    pub max_providers: usize,
    pub max_backdrops: usize,
    pub max_cast: usize,
}

impl AppConfig {
    /// Load config: user file if it exists, otherwise built-in defaults.
    /// `TMDB_API_KEY` overrides the provider key either way.
    pub fn load() -> Result<Self, MarqueeError> {
        let user_path = Self::config_path();
        let mut config = if user_path.exists() {
            Self::load_from(&user_path)?
        } else {
            tracing::debug!(path = %user_path.display(), "No user config, using defaults");
            Self::parse(DEFAULT_CONFIG)?
        };
        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, MarqueeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MarqueeError::Config(e.to_string()))?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self, MarqueeError> {
        toml::from_str(content).map_err(|e| MarqueeError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), MarqueeError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), MarqueeError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MarqueeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace the provider key when an override is present and non-empty.
    pub fn apply_api_key_override(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = key;
        }
    }

    /// Reject base URLs that cannot be requested.
    pub fn validate(&self) -> Result<(), MarqueeError> {
        for (name, raw) in [
            ("provider.base_url", &self.provider.base_url),
            ("provider.image_base_url", &self.provider.image_base_url),
            ("backend.base_url", &self.backend.base_url),
        ] {
            let url = Url::parse(raw)
                .map_err(|e| MarqueeError::Config(format!("{name}: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(MarqueeError::Config(format!(
                    "{name}: unsupported scheme {}",
                    url.scheme()
                )));
            }
        }
        if self.display.region.trim().is_empty() {
            return Err(MarqueeError::Config("display.region is empty".into()));
        }
        Ok(())
    }

    /// Provider key, or `None` when unset.
    pub fn api_key(&self) -> Option<String> {
        non_empty(&self.provider.api_key)
    }

    /// Backend session cookie, or `None` when unset.
    pub fn session_cookie(&self) -> Option<String> {
        non_empty(&self.backend.session_cookie)
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "marquee")
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
