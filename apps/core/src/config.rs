//! Environment-driven configuration.
//!
//! `load()` applies a `.env` file first (if one exists) and then reads the
//! process environment. Every value except the API key has a default.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::error::AppError;

pub const ENV_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_API_BASE: &str = "STUDYBUDDY_API_BASE";
pub const ENV_MODEL: &str = "STUDYBUDDY_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "STUDYBUDDY_TIMEOUT_SECS";
pub const ENV_CHAT_TEMPERATURE: &str = "STUDYBUDDY_CHAT_TEMPERATURE";
pub const ENV_EXAM_TEMPERATURE: &str = "STUDYBUDDY_EXAM_TEMPERATURE";
pub const ENV_EXAM_MAX_TOKENS: &str = "STUDYBUDDY_EXAM_MAX_TOKENS";
pub const ENV_LOG_FORMAT: &str = "STUDYBUDDY_LOG_FORMAT";

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_EXAM_MAX_TOKENS: u32 = 2000;

/// How log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON, one object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Settings for the completion service and the two pipelines.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Bearer token for the completion service.
    #[validate(length(min = 1))]
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    #[validate(url)]
    pub api_base: String,
    #[validate(length(min = 1))]
    pub model: String,
    /// Per-request timeout, in seconds.
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    #[validate(range(min = 0.0, max = 2.0))]
    pub chat_temperature: f32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub exam_temperature: f32,
    #[validate(range(min = 1, max = 8192))]
    pub exam_max_tokens: u32,
    pub log_format: LogFormat,
}

// Keeps the API key out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("chat_temperature", &self.chat_temperature)
            .field("exam_temperature", &self.exam_temperature)
            .field("exam_max_tokens", &self.exam_max_tokens)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl AppConfig {
    /// A configuration with every default and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chat_temperature: DEFAULT_TEMPERATURE,
            exam_temperature: DEFAULT_TEMPERATURE,
            exam_max_tokens: DEFAULT_EXAM_MAX_TOKENS,
            log_format: LogFormat::default(),
        }
    }

    /// Applies `.env` (if present), then reads the environment.
    pub fn load() -> Result<Self, AppError> {
        match dotenv::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file applied: {}", e),
        }
        Self::from_env()
    }

    /// Reads and validates the configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var(ENV_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config(format!("{} is not set", ENV_API_KEY)))?;

        let defaults = Self::new(api_key);
        let config = Self {
            api_base: env_or(ENV_API_BASE, defaults.api_base.clone())?,
            model: env_or(ENV_MODEL, defaults.model.clone())?,
            timeout_secs: env_or(ENV_TIMEOUT_SECS, defaults.timeout_secs)?,
            chat_temperature: env_or(ENV_CHAT_TEMPERATURE, defaults.chat_temperature)?,
            exam_temperature: env_or(ENV_EXAM_TEMPERATURE, defaults.exam_temperature)?,
            exam_max_tokens: env_or(ENV_EXAM_MAX_TOKENS, defaults.exam_max_tokens)?,
            log_format: env_or(ENV_LOG_FORMAT, defaults.log_format)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of the chat-completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{}: invalid value '{}': {}", key, raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 8] = [
        ENV_API_KEY,
        ENV_API_BASE,
        ENV_MODEL,
        ENV_TIMEOUT_SECS,
        ENV_CHAT_TEMPERATURE,
        ENV_EXAM_TEMPERATURE,
        ENV_EXAM_MAX_TOKENS,
        ENV_LOG_FORMAT,
    ];

    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let kvs: Vec<(&str, Option<&str>)> = ALL_VARS
            .iter()
            .map(|key| {
                let value = vars.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(kvs, f);
    }

    #[test]
    fn test_defaults_with_only_api_key() {
        with_env(&[(ENV_API_KEY, "gsk_test")], || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config.api_key, "gsk_test");
            assert_eq!(config.api_base, DEFAULT_API_BASE);
            assert_eq!(config.model, DEFAULT_MODEL);
            assert_eq!(config.timeout(), Duration::from_secs(60));
            assert_eq!(config.exam_max_tokens, 2000);
            assert_eq!(config.log_format, LogFormat::Pretty);
        });
    }

    #[test]
    fn test_missing_api_key() {
        with_env(&[], || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(msg) if msg.contains(ENV_API_KEY)));
        });
    }

    #[test]
    fn test_overrides() {
        with_env(
            &[
                (ENV_API_KEY, "k"),
                (ENV_API_BASE, "http://localhost:9000/v1/"),
                (ENV_MODEL, "llama-3.3-70b-versatile"),
                (ENV_TIMEOUT_SECS, "15"),
                (ENV_CHAT_TEMPERATURE, "0.7"),
                (ENV_LOG_FORMAT, "JSON"),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(config.model, "llama-3.3-70b-versatile");
                assert_eq!(config.timeout_secs, 15);
                assert_eq!(config.chat_temperature, 0.7);
                assert_eq!(config.log_format, LogFormat::Json);
                assert_eq!(
                    config.completions_url(),
                    "http://localhost:9000/v1/chat/completions"
                );
            },
        );
    }

    #[test]
    fn test_unparseable_value_names_variable() {
        with_env(&[(ENV_API_KEY, "k"), (ENV_TIMEOUT_SECS, "soon")], || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(msg) if msg.contains(ENV_TIMEOUT_SECS)));
        });
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        with_env(&[(ENV_API_KEY, "k"), (ENV_CHAT_TEMPERATURE, "3.5")], || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
        with_env(&[(ENV_API_KEY, "k"), (ENV_API_BASE, "not a url")], || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", AppConfig::new("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }
}
