//! Configuration loading, validation, and management for niagate.
//!
//! Loads configuration from `~/.niagate/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.
//!
//! The guard policy (term lists, patterns, refusal texts, strategies) is
//! configuration data. It lives in the `[policy]` table or in a standalone
//! TOML file referenced by `policy_file`, so it can change without a
//! rebuild.

pub mod defaults;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.niagate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Standalone policy document; replaces `[policy]` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_file: Option<PathBuf>,

    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Text-generation backend configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Curriculum data store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Guard policy
    #[serde(default)]
    pub policy: PolicyConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Route the proxy endpoint is served on (also served at `/`).
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8787
}
fn default_path() -> String {
    "/niaProxy".into()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// "gemini", "openai", or any OpenAI-compatible provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Upper bound on a single completion call; expiry counts as a failure.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-3-flash-preview".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            api_url: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "file", "sqlite", or "memory"
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Snapshot file or SQLite database path (default under `~/.niagate/`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_store_backend() -> String {
    "file".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: None,
        }
    }
}

impl StoreConfig {
    /// The configured path, or the backend's default location.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| match self.backend.as_str() {
            "sqlite" => AppConfig::config_dir().join("curriculum.db"),
            _ => AppConfig::config_dir().join("curriculum.json"),
        })
    }
}

/// How URL violations in model output are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlStrategy {
    /// Replace the whole reply with an output-fallback text.
    #[default]
    ReplaceReply,
    /// Remove only the unapproved URLs, keep the surrounding text.
    StripUrls,
}

/// How directive-language violations in model output are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveStrategy {
    /// Replace the whole reply with an output-fallback text.
    #[default]
    ReplaceReply,
    /// Rewrite directive phrases with hedged equivalents.
    Soften,
}

/// A lexical softening rewrite: regex source and its hedged replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SofteningRule {
    pub pattern: String,
    pub replacement: String,
}

/// Pre-authored refusal texts, one set per failure category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefusalConfig {
    #[serde(default = "default_input_blocked")]
    pub input_blocked: Vec<String>,

    #[serde(default = "default_output_fallback")]
    pub output_fallback: Vec<String>,

    #[serde(default = "default_server_error")]
    pub server_error: Vec<String>,
}

fn default_input_blocked() -> Vec<String> {
    defaults::owned(defaults::INPUT_BLOCKED_REPLIES)
}
fn default_output_fallback() -> Vec<String> {
    defaults::owned(defaults::OUTPUT_FALLBACK_REPLIES)
}
fn default_server_error() -> Vec<String> {
    defaults::owned(defaults::SERVER_ERROR_REPLIES)
}

impl Default for RefusalConfig {
    fn default() -> Self {
        Self {
            input_blocked: default_input_blocked(),
            output_fallback: default_output_fallback(),
            server_error: default_server_error(),
        }
    }
}

/// Fixed informational replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_hard_stop_message")]
    pub hard_stop: String,

    #[serde(default = "default_not_available_message")]
    pub not_available: String,

    #[serde(default = "default_context_missing_message")]
    pub context_missing: String,
}

fn default_hard_stop_message() -> String {
    defaults::HARD_STOP_MESSAGE.into()
}
fn default_not_available_message() -> String {
    defaults::NOT_AVAILABLE_MESSAGE.into()
}
fn default_context_missing_message() -> String {
    defaults::CONTEXT_MISSING_MESSAGE.into()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            hard_stop: default_hard_stop_message(),
            not_available: default_not_available_message(),
            context_missing: default_context_missing_message(),
        }
    }
}

/// The guard policy, passed into the classifier and sanitizer at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_hard_stop_terms")]
    pub hard_stop_terms: Vec<String>,

    #[serde(default = "default_blocked_terms")]
    pub blocked_terms: Vec<String>,

    /// Regex sources; compiled case-insensitive.
    #[serde(default = "default_directive_patterns")]
    pub directive_patterns: Vec<String>,

    #[serde(default)]
    pub url_strategy: UrlStrategy,

    #[serde(default)]
    pub directive_strategy: DirectiveStrategy,

    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,

    /// Record every policy decision through the audit log
    #[serde(default = "default_true")]
    pub audit: bool,

    #[serde(default = "default_softening_rules")]
    pub softening_rules: Vec<SofteningRule>,

    #[serde(default)]
    pub refusals: RefusalConfig,

    #[serde(default)]
    pub messages: MessagesConfig,
}

fn default_hard_stop_terms() -> Vec<String> {
    defaults::owned(defaults::HARD_STOP_TERMS)
}
fn default_blocked_terms() -> Vec<String> {
    defaults::owned(defaults::BLOCKED_TERMS)
}
fn default_directive_patterns() -> Vec<String> {
    defaults::owned(defaults::DIRECTIVE_PATTERNS)
}
fn default_softening_rules() -> Vec<SofteningRule> {
    defaults::SOFTENING_RULES
        .iter()
        .map(|(pattern, replacement)| SofteningRule {
            pattern: (*pattern).into(),
            replacement: (*replacement).into(),
        })
        .collect()
}
fn default_system_instruction() -> String {
    defaults::SYSTEM_INSTRUCTION.into()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hard_stop_terms: default_hard_stop_terms(),
            blocked_terms: default_blocked_terms(),
            directive_patterns: default_directive_patterns(),
            softening_rules: default_softening_rules(),
            url_strategy: UrlStrategy::default(),
            directive_strategy: DirectiveStrategy::default(),
            refusals: RefusalConfig::default(),
            messages: MessagesConfig::default(),
            system_instruction: default_system_instruction(),
            audit: true,
        }
    }
}

impl PolicyConfig {
    /// Load a standalone policy document.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let policy: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        policy.validate()?;
        Ok(policy)
    }

    /// Structural checks. Pattern compilation is checked by the guard crate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sets = [
            ("refusals.input_blocked", &self.refusals.input_blocked),
            ("refusals.output_fallback", &self.refusals.output_fallback),
            ("refusals.server_error", &self.refusals.server_error),
        ];
        for (name, set) in sets {
            if set.is_empty() || set.iter().any(|s| s.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must contain at least one non-empty reply"
                )));
            }
        }

        let messages = [
            ("messages.hard_stop", &self.messages.hard_stop),
            ("messages.not_available", &self.messages.not_available),
            ("messages.context_missing", &self.messages.context_missing),
        ];
        for (name, text) in messages {
            if text.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{name} cannot be empty")));
            }
        }

        if self.system_instruction.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "system_instruction cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.niagate/config.toml).
    ///
    /// Also checks environment variables:
    /// - `NIAGATE_API_KEY` (highest priority), then `GEMINI_API_KEY` or
    ///   `OPENAI_API_KEY` when it matches `completion.provider`
    /// - `NIAGATE_PROVIDER`, `NIAGATE_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific path, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides();
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

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(policy_path) = config.policy_file.clone() {
            let policy_path = if policy_path.is_relative() {
                path.parent()
                    .map(|dir| dir.join(&policy_path))
                    .unwrap_or(policy_path)
            } else {
                policy_path
            };
            tracing::info!(path = %policy_path.display(), "Loading policy file");
            config.policy = PolicyConfig::load_from(&policy_path)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// `NIAGATE_API_KEY` applies to any provider. `GEMINI_API_KEY` and
    /// `OPENAI_API_KEY` apply only when they name the configured provider.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(provider) = lookup("NIAGATE_PROVIDER") {
            self.completion.provider = provider;
        }

        if let Some(model) = lookup("NIAGATE_MODEL") {
            self.completion.model = model;
        }

        let provider_key = match self.completion.provider.as_str() {
            "gemini" => Some("GEMINI_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        };
        let env_key = lookup("NIAGATE_API_KEY").or_else(|| provider_key.and_then(|name| lookup(name)));
        if let Some(key) = env_key {
            self.completion.api_key = Some(key);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".niagate")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.completion.temperature) {
            return Err(ConfigError::ValidationError(
                "completion.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.completion.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "completion.max_output_tokens must be > 0".into(),
            ));
        }

        if self.completion.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "completion.timeout_secs must be > 0".into(),
            ));
        }

        if !self.gateway.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "gateway.path must start with '/'".into(),
            ));
        }

        self.policy.validate()
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.completion.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
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
}
