use crate::core::error::ChatError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BASE_URL_ENV: &str = "SHOPCHAT_BASE_URL";
pub const MODEL_ENV: &str = "SHOPCHAT_MODEL";

/// On-disk configuration, `~/.shopchat/config.yaml`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

/// Fully resolved settings handed to the inference client.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Config {
    fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".shopchat")
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    pub fn history_path() -> PathBuf {
        Self::config_dir().join("input_history.txt")
    }

    /// Loads the config at `path`, or the default location.
    ///
    /// A missing file yields defaults and a best-effort attempt to write them
    /// back so the user has something to edit. A file that exists but does not
    /// parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ChatError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config = serde_yml::from_str::<Config>(&contents)
                .map_err(|e| ChatError::Config(format!("Parse {}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let config = Config::default();
        if let Err(e) = config.save(&path) {
            tracing::debug!(path = %path.display(), error = %e, "could not write default config");
        }
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let yaml_content = serde_yml::to_string(self)?;
        fs::write(path, yaml_content)?;
        Ok(())
    }

    /// Applies precedence: overrides, then environment, then file, then defaults.
    pub fn resolve<F>(self, overrides: &Overrides, env: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let api_key = non_blank(env(API_KEY_ENV)).or_else(|| non_blank(self.api_key));
        let base_url = non_blank(overrides.base_url.clone())
            .or_else(|| non_blank(env(BASE_URL_ENV)))
            .or_else(|| non_blank(self.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_blank(overrides.model.clone())
            .or_else(|| non_blank(env(MODEL_ENV)))
            .or_else(|| non_blank(self.model))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Settings {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}
