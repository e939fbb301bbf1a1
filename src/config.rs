//! Process configuration read from the environment (and `.env`).

use crate::error::AssistantError;
use crate::gemini::{GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::memory::DEFAULT_MAX_SESSIONS;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CATALOG_PATH: &str = "data/investment_products.csv";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ASK_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub catalog_path: PathBuf,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
    pub ask_timeout: Duration,
    /// Upper bound on chats kept by the HTTP server
    pub max_sessions: usize,
}

impl Config {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> crate::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("GOOGLE_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .unwrap_or_else(|| {
                warn!("GOOGLE_API_KEY not set; questions will fail until it is configured");
                String::new()
            });

        let port = match non_empty("PORT").or_else(|| non_empty("API_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AssistantError::ConfigError(format!("invalid PORT '{}': {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        let ask_timeout_secs = match non_empty("ASK_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AssistantError::ConfigError(format!("invalid ASK_TIMEOUT_SECS '{}': {}", raw, e))
            })?,
            None => DEFAULT_ASK_TIMEOUT_SECS,
        };

        let max_sessions = match non_empty("MAX_CHAT_SESSIONS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AssistantError::ConfigError(format!("invalid MAX_CHAT_SESSIONS '{}': {}", raw, e))
            })?,
            None => DEFAULT_MAX_SESSIONS,
        };

        Ok(Self {
            api_key,
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            catalog_path: non_empty("CATALOG_PATH")
                .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string())
                .into(),
            port,
            static_dir: non_empty("STATIC_DIR").map(PathBuf::from),
            ask_timeout: Duration::from_secs(ask_timeout_secs),
            max_sessions,
        })
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> crate::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert!(config.api_key.is_empty());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.catalog_path, PathBuf::from(DEFAULT_CATALOG_PATH));
        assert!(config.static_dir.is_none());
        assert_eq!(config.ask_timeout, Duration::from_secs(DEFAULT_ASK_TIMEOUT_SECS));
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn test_google_key_wins_over_gemini_key() {
        let config =
            config_from(&[("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]).unwrap();
        assert_eq!(config.api_key, "google");

        let config = config_from(&[("GOOGLE_API_KEY", ""), ("GEMINI_API_KEY", "gemini")]).unwrap();
        assert_eq!(config.api_key, "gemini");
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GEMINI_MODEL", "gemini-1.5-flash"),
            ("API_PORT", "9090"),
            ("CATALOG_PATH", "data/investment_products.json"),
            ("STATIC_DIR", "static"),
            ("ASK_TIMEOUT_SECS", "15"),
            ("MAX_CHAT_SESSIONS", "50"),
        ])
        .unwrap();

        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.port, 9090);
        assert_eq!(config.catalog_path, PathBuf::from("data/investment_products.json"));
        assert_eq!(config.static_dir, Some(PathBuf::from("static")));
        assert_eq!(config.ask_timeout, Duration::from_secs(15));
        assert_eq!(config.max_sessions, 50);
        assert_eq!(config.gemini().model, "gemini-1.5-flash");
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AssistantError::ConfigError(_)));
    }
}
