//! Configuration loading, validation, and management for KASA.
//!
//! Loads configuration from `$KASA_CONFIG` or `~/.kasa/config.toml` with
//! environment variable overrides. Validated once at startup; the resulting
//! `AppConfig` is passed by reference into the provider, the tutor and the
//! HTTP gateway. Nothing reads the environment after this point.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.kasa/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the chat-completion provider. Required to serve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier sent with every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Response-length ceiling in tokens
    #[serde(default = "default_max_tokens", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Optional nucleus sampling cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Upper bound on one provider call, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Learner-facing policy knobs
    #[serde(default)]
    pub tutor: TutorConfig,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.5
}
fn default_max_tokens() -> Option<u32> {
    Some(500)
}
fn default_request_timeout_secs() -> u64 {
    45
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("tutor", &self.tutor)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Age assumed when a request omits it or sends something non-numeric
    #[serde(default = "default_age")]
    pub default_age: f64,

    /// Longest accepted question, in characters after trimming
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Longest reply returned to the learner, in characters
    #[serde(default = "default_reply_char_cap")]
    pub reply_char_cap: usize,
}

fn default_age() -> f64 {
    8.0
}
fn default_max_message_chars() -> usize {
    2000
}
fn default_reply_char_cap() -> usize {
    1500
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            default_age: default_age(),
            max_message_chars: default_max_message_chars(),
            reply_char_cap: default_reply_char_cap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Answer provider failures with 200 instead of 500 (fallback text either way)
    #[serde(default)]
    pub mask_provider_failures: bool,

    /// Allowed CORS origins. Empty = any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mask_provider_failures: false,
            cors_origins: vec![],
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `$KASA_CONFIG` or `~/.kasa/config.toml`,
    /// then apply environment overrides:
    /// - `KASA_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `KASA_API_URL`, `KASA_MODEL`, `KASA_HOST`
    /// - `PORT`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("KASA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::config_path());
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`, so callers (and tests)
    /// decide where variables come from.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank("KASA_API_KEY").or_else(|| non_blank("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_blank("KASA_API_URL") {
            self.api_url = url;
        }
        if let Some(model) = non_blank("KASA_MODEL") {
            self.model = model;
        }
        if let Some(host) = non_blank("KASA_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = non_blank("PORT") {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("PORT must be a port number, got {port:?}"))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".kasa")
    }

    /// Default location of the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if let Some(top_p) = self.top_p {
            if !(top_p > 0.0 && top_p <= 1.0) {
                return Err(ConfigError::ValidationError(
                    "top_p must be in (0.0, 1.0]".into(),
                ));
            }
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.tutor.max_message_chars == 0 {
            return Err(ConfigError::ValidationError(
                "tutor.max_message_chars must be > 0".into(),
            ));
        }

        if self.tutor.reply_char_cap == 0 {
            return Err(ConfigError::ValidationError(
                "tutor.reply_char_cap must be > 0".into(),
            ));
        }

        if !self.tutor.default_age.is_finite() || self.tutor.default_age < 0.0 {
            return Err(ConfigError::ValidationError(
                "tutor.default_age must be a non-negative number".into(),
            ));
        }

        Ok(())
    }

    /// The provider credential, or a startup error naming where to set it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingCredential)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: None,
            request_timeout_secs: default_request_timeout_secs(),
            tutor: TutorConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No provider credential configured: set KASA_API_KEY or OPENAI_API_KEY, or api_key in config.toml")]
    MissingCredential,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.tutor.max_message_chars, 2000);
        assert_eq!(config.tutor.reply_char_cap, 1500);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.max_tokens, Some(500));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_top_p_rejected() {
        let config = AppConfig {
            top_p: Some(0.0),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.gateway.port, 3000);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
model = "gpt-4o"
temperature = 0.3

[tutor]
default_age = 6

[gateway]
port = 8080
mask_provider_failures = true
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.tutor.default_age, 6.0);
        assert_eq!(config.tutor.max_message_chars, 2000);
        assert_eq!(config.gateway.port, 8080);
        assert!(config.gateway.mask_provider_failures);
    }

    #[test]
    fn unparseable_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = [unterminated").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_take_priority() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config
            .apply_env(env_of(&[
                ("OPENAI_API_KEY", "sk-openai"),
                ("KASA_API_KEY", "sk-kasa"),
                ("KASA_MODEL", "gpt-4o"),
                ("PORT", "8081"),
            ]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-kasa"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.gateway.port, 8081);
    }

    #[test]
    fn openai_key_used_when_kasa_key_blank() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_of(&[("KASA_API_KEY", "  "), ("OPENAI_API_KEY", "sk-openai")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-openai"));
    }

    #[test]
    fn bad_port_env_is_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env_of(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_credential_is_reported() {
        let config = AppConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ConfigError::MissingCredential)
        ));

        let blank = AppConfig {
            api_key: Some("   ".into()),
            ..AppConfig::default()
        };
        assert!(!blank.has_api_key());

        let set = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        assert_eq!(set.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-super-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
