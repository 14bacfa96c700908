use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tokio::fs;

use crate::error::{Result, ScriptError};

pub const DEFAULT_CLOUD_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CLOUD_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3:8b";

/// Sampling temperature for every cloud request. Not configurable.
pub const CLOUD_TEMPERATURE: f64 = 0.7;

/// Cloud (Gemini) backend settings. The API key is optional here; the
/// backend refuses to start without one.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_CLOUD_BASE_URL.to_string(),
            model: DEFAULT_CLOUD_MODEL.to_string(),
        }
    }
}

impl CloudConfig {
    /// The trimmed API key, or `None` when it is absent or blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Local (Ollama) backend settings. `url` is only the default offered to the
/// user; each request carries its own endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalConfig {
    pub url: String,
    pub model: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LOCAL_URL.to_string(),
            model: DEFAULT_LOCAL_MODEL.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub cloud: CloudConfig,
    pub local: LocalConfig,
}

impl Settings {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Settings::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        settings.cloud.api_key = get("GEMINI_API_KEY").or_else(|| get("API_KEY"));
        if let Some(model) = get("REELSCRIPT_CLOUD_MODEL") {
            settings.cloud.model = model;
        }
        if let Some(base_url) = get("REELSCRIPT_CLOUD_BASE_URL") {
            settings.cloud.base_url = base_url;
        }
        if let Some(url) = get("REELSCRIPT_LOCAL_URL") {
            settings.local.url = url;
        }
        if let Some(model) = get("REELSCRIPT_LOCAL_MODEL") {
            settings.local.model = model;
        }

        settings
    }

    /// Environment settings overlaid with the TOML config file, if one exists.
    pub async fn load() -> Result<Self> {
        let settings = Self::from_env();
        match config_path() {
            Some(path) => settings.with_file(&path).await,
            None => Ok(settings),
        }
    }

    /// Overlay a TOML file. A missing file leaves the settings unchanged.
    pub async fn with_file(self, path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found; using defaults/env");
                return Ok(self);
            }
            Err(e) => {
                return Err(ScriptError::InvalidConfig {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let file: SettingsToml =
            toml::from_str(&content).map_err(|e| ScriptError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(file.overlay(self))
    }
}

/// `$REELSCRIPT_CONFIG`, else `<config dir>/reelscript/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    resolve_config_path(
        std::env::var_os("REELSCRIPT_CONFIG"),
        dirs::config_dir(),
    )
}

fn resolve_config_path(explicit: Option<OsString>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .or_else(|| config_dir.map(|dir| dir.join("reelscript").join("config.toml")))
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    cloud: Option<CloudToml>,
    local: Option<LocalToml>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CloudToml {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocalToml {
    url: Option<String>,
    model: Option<String>,
}

impl SettingsToml {
    fn overlay(self, mut base: Settings) -> Settings {
        if let Some(cloud) = self.cloud {
            if let Some(key) = cloud.api_key.filter(|k| !k.trim().is_empty()) {
                base.cloud.api_key = Some(key);
            }
            if let Some(base_url) = cloud.base_url {
                base.cloud.base_url = base_url;
            }
            if let Some(model) = cloud.model {
                base.cloud.model = model;
            }
        }
        if let Some(local) = self.local {
            if let Some(url) = local.url {
                base.local.url = url;
            }
            if let Some(model) = local.model {
                base.local.model = model;
            }
        }
        base
    }
}
