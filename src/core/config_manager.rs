// src/core/config_manager.rs
//! Configuration: `config.yaml` per environment, then environment variable overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SHARE_BASE_URL: &str = "https://smartresume.app";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1500;
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub share_base_url: String,
    /// Remote backend root. `None` means the simulated backend is used.
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub api_timeout_seconds: u64,
    pub simulated_delay_ms: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            api_url: None,
            api_token: None,
            api_timeout_seconds: DEFAULT_API_TIMEOUT_SECS,
            simulated_delay_ms: DEFAULT_SIMULATED_DELAY_MS,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: AppConfig,
    #[serde(default)]
    production: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub app: AppConfig,
    /// The file the settings came from. `None` when defaults were used.
    pub source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration for the current environment from `./config.yaml`.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir.join(CONFIG_FILE), &environment, |key| {
            std::env::var(key).ok()
        })
    }

    fn get_environment() -> String {
        std::env::var("RESUME_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Load from an explicit file, reading overrides through `var`.
    pub fn load_from<F>(config_path: &Path, environment: &str, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = config_path.exists().then(|| config_path.to_path_buf());
        let mut app = if source.is_some() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let file: ConfigFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            match environment {
                "production" => file.production,
                _ => file.local,
            }
        } else {
            AppConfig::default()
        };

        let non_empty = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(dir) = non_empty("RESUME_OUTPUT_DIR") {
            app.output_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty("RESUME_SHARE_BASE_URL") {
            app.share_base_url = url;
        }
        if let Some(url) = non_empty("RESUME_API_URL") {
            app.api_url = Some(url);
        }
        if let Some(token) = non_empty("RESUME_API_TOKEN") {
            app.api_token = Some(token);
        }
        if let Some(file) = non_empty("RESUME_LOG_FILE") {
            app.log_file = Some(PathBuf::from(file));
        }

        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .map_or_else(std::env::current_dir, Ok)
            .context("Failed to get current directory")?;
        app.output_dir = Self::resolve_path(&base_dir, &app.output_dir);
        app.log_file = app.log_file.map(|f| Self::resolve_path(&base_dir, &f));

        Ok(Self {
            environment: environment.to_string(),
            app,
            source,
        })
    }

    fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }
}
