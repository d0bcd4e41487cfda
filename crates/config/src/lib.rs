//! Configuration loading, validation, and management for Ledgerbrief.
//!
//! Loads configuration from `~/.ledgerbrief/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.ledgerbrief/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generation (language-model) settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Similarity index settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Rendered document output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Mail delivery settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation: GenerationConfig::default(),
            knowledge: KnowledgeConfig::default(),
            output: OutputConfig::default(),
            delivery: DeliveryConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Settings for the two-stage answer generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Which configured provider answers enquiries
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Completion model for both the draft and the review pass
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model for query similarity search
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Token budget for the initial draft
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Token budget for the review pass
    #[serde(default = "default_review_max_tokens")]
    pub review_max_tokens: u32,

    /// Drafts longer than this many characters skip review entirely
    #[serde(default = "default_review_skip_threshold")]
    pub review_skip_threshold: usize,

    /// Review input is truncated to this many characters
    #[serde(default = "default_review_input_limit")]
    pub review_input_limit: usize,

    /// Wall-clock bound on the review call
    #[serde(default = "default_review_timeout_secs")]
    pub review_timeout_secs: u64,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}
fn default_max_tokens() -> u32 {
    1800
}
fn default_review_max_tokens() -> u32 {
    700
}
fn default_review_skip_threshold() -> usize {
    1500
}
fn default_review_input_limit() -> usize {
    2000
}
fn default_review_timeout_secs() -> u64 {
    15
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            embedding_model: default_embedding_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            review_max_tokens: default_review_max_tokens(),
            review_skip_threshold: default_review_skip_threshold(),
            review_input_limit: default_review_input_limit(),
            review_timeout_secs: default_review_timeout_secs(),
        }
    }
}

/// Where the similarity index lives and how many chunks to retrieve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Binary vector file
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Ordinal → chunk-file metadata table
    #[serde(default = "default_metadata_path")]
    pub metadata_path: String,

    /// Root directory chunk-file paths are resolved against
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// How many nearest chunks feed the prompt
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_index_path() -> String {
    "data/accounting/chunks.lbx".into()
}
fn default_metadata_path() -> String {
    "data/accounting/metadata.json".into()
}
fn default_data_dir() -> String {
    "data".into()
}
fn default_top_k() -> usize {
    2
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            metadata_path: default_metadata_path(),
            data_dir: default_data_dir(),
            top_k: default_top_k(),
        }
    }
}

/// Where rendered documents are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

fn default_output_dir() -> String {
    "output".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Mail vendor credentials and sender identity.
#[derive(Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Bulk-send endpoint
    #[serde(default = "default_delivery_endpoint")]
    pub endpoint: String,

    /// Vendor public API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    /// Vendor private API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_delivery_endpoint() -> String {
    "https://api.mailjet.com/v3.1/send".into()
}
fn default_from_email() -> String {
    "noreply@ledgerbrief.uk".into()
}
fn default_from_name() -> String {
    "Ledgerbrief Reports".into()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_delivery_endpoint(),
            public_key: None,
            private_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
        }
    }
}

impl DeliveryConfig {
    /// Both vendor keys are present.
    pub fn has_credentials(&self) -> bool {
        self.public_key.is_some() && self.private_key.is_some()
    }
}

impl std::fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("endpoint", &self.endpoint)
            .field("public_key", &redact(&self.public_key))
            .field("private_key", &redact(&self.private_key))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

/// HTTP gateway bind address and browser origin policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// The single browser origin allowed to call the API
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    10000
}
fn default_allowed_origin() -> String {
    "https://www.ledgerbrief.uk".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
        }
    }
}

/// Per-provider connection settings.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.ledgerbrief/config.toml).
    ///
    /// Environment variables fill any gaps the file leaves:
    /// - `OPENAI_API_KEY` — key for the configured generation provider
    /// - `MJ_APIKEY_PUBLIC` / `MJ_APIKEY_PRIVATE` — mail vendor keys
    /// - `LEDGERBRIEF_PROVIDER` / `LEDGERBRIEF_MODEL` — generation overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if let Ok(provider) = std::env::var("LEDGERBRIEF_PROVIDER") {
            config.generation.provider = provider;
        }

        if let Ok(model) = std::env::var("LEDGERBRIEF_MODEL") {
            config.generation.model = model;
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            let entry = config
                .providers
                .entry(config.generation.provider.clone())
                .or_default();
            if entry.api_key.is_none() {
                entry.api_key = Some(key);
            }
        }

        if config.delivery.public_key.is_none() {
            config.delivery.public_key = std::env::var("MJ_APIKEY_PUBLIC").ok();
        }
        if config.delivery.private_key.is_none() {
            config.delivery.private_key = std::env::var("MJ_APIKEY_PRIVATE").ok();
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ledgerbrief")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.temperature < 0.0 || self.generation.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "generation.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.generation.max_tokens == 0 || self.generation.review_max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "generation token budgets must be at least 1".into(),
            ));
        }

        if self.knowledge.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "knowledge.top_k must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The API key configured for the active generation provider, if any.
    pub fn generation_api_key(&self) -> Option<&str> {
        self.providers
            .get(&self.generation.provider)
            .and_then(|p| p.api_key.as_deref())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
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
