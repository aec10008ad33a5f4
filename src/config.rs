use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    CLEVELAND_API_URL, DEFAULT_MAX_SOURCE_WINDOW, HARVARD_API_URL,
};
use crate::error::{CuratorError, Result};
use crate::types::default_page_size;

pub const DEFAULT_CONFIG_PATH: &str = "curator.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    pub exhibition: ExhibitionConfig,
    pub log_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub page_size: usize,
    pub metrics_port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub cleveland_url: String,
    pub harvard_url: String,
    pub harvard_api_key: Option<String>,
    pub max_source_window: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExhibitionConfig {
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            sources: SourcesConfig::default(),
            exhibition: ExhibitionConfig::default(),
            log_dir: "logs".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            page_size: default_page_size(),
            metrics_port: None,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            cleveland_url: CLEVELAND_API_URL.to_string(),
            harvard_url: HARVARD_API_URL.to_string(),
            harvard_api_key: None,
            max_source_window: DEFAULT_MAX_SOURCE_WINDOW,
            timeout_seconds: 10,
        }
    }
}

impl Default for ExhibitionConfig {
    fn default() -> Self {
        Self {
            path: "exhibition.json".to_string(),
        }
    }
}

impl SourcesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Load `curator.toml` (or `$CURATOR_CONFIG`) if present, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("CURATOR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(config_path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CuratorError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path, e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Taking the lookup as a closure
    /// keeps tests away from the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("HARVARD_ART_MUSEUMS_API").filter(|k| !k.is_empty()) {
            self.sources.harvard_api_key = Some(key);
        }
        if let Some(url) = lookup("CURATOR_CLEVELAND_URL") {
            self.sources.cleveland_url = url;
        }
        if let Some(url) = lookup("CURATOR_HARVARD_URL") {
            self.sources.harvard_url = url;
        }
        if let Some(path) = lookup("CURATOR_EXHIBITION_PATH") {
            self.exhibition.path = path;
        }
        if let Some(port) = lookup("CURATOR_PORT") {
            self.server.port = parse_var("CURATOR_PORT", &port)?;
        }
        if let Some(size) = lookup("CURATOR_PAGE_SIZE") {
            self.server.page_size = parse_var("CURATOR_PAGE_SIZE", &size)?;
        }
        if let Some(secs) = lookup("CURATOR_TIMEOUT_SECS") {
            self.sources.timeout_seconds = parse_var("CURATOR_TIMEOUT_SECS", &secs)?;
        }
        if let Some(port) = lookup("CURATOR_METRICS_PORT") {
            self.server.metrics_port = Some(parse_var("CURATOR_METRICS_PORT", &port)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.page_size == 0 {
            return Err(CuratorError::Config("page_size must be greater than 0".into()));
        }
        if self.sources.max_source_window == 0 {
            return Err(CuratorError::Config(
                "max_source_window must be greater than 0".into(),
            ));
        }
        // Deep pages fetch up to one page per source in a single request
        if self.server.page_size > self.sources.max_source_window {
            return Err(CuratorError::Config(format!(
                "page_size {} exceeds max_source_window {}",
                self.server.page_size, self.sources.max_source_window
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CuratorError::Config(format!("Invalid value for {}: '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.page_size, 20);
        assert_eq!(config.sources.max_source_window, 100);
        assert!(config.sources.harvard_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 8080

            [sources]
            harvard_api_key = "abc"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.page_size, 20);
        assert_eq!(config.sources.harvard_api_key.as_deref(), Some("abc"));
        assert_eq!(config.exhibition.path, "exhibition.json");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("HARVARD_ART_MUSEUMS_API", "secret"),
            ("CURATOR_PAGE_SIZE", "12"),
            ("CURATOR_HARVARD_URL", "http://localhost:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.sources.harvard_api_key.as_deref(), Some("secret"));
        assert_eq!(config.server.page_size, 12);
        assert_eq!(config.sources.harvard_url, "http://localhost:9000");
    }

    #[test]
    fn test_invalid_env_value_is_config_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(|k| (k == "CURATOR_PORT").then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(matches!(err, CuratorError::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        config.server.page_size = 0;
        assert!(matches!(config.validate(), Err(CuratorError::Config(_))));
    }

    #[test]
    fn test_page_size_above_window_rejected() {
        let mut config = Config::default();
        config.server.page_size = 150;
        assert!(matches!(config.validate(), Err(CuratorError::Config(_))));
    }
}
