//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use triage_core::{ConversationState, DEFAULT_CONFIDENCE_THRESHOLD};

use crate::{ConfigError, RepliesConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialog policy configuration
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Knowledge file locations
    #[serde(default)]
    pub knowledge: KnowledgePaths,

    /// Reply templates
    #[serde(default)]
    pub replies: RepliesConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_dialog()?;

        if self.environment.is_strict() && !self.server.cors_enabled {
            return Err(ConfigError::invalid(
                "server.cors_enabled",
                "CORS cannot be disabled outside development",
            ));
        }

        Ok(())
    }

    /// Validate server settings
    pub fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port cannot be 0"));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "server.request_timeout_seconds",
                "Request timeout must be positive",
            ));
        }
        Ok(())
    }

    /// Validate dialog policy settings
    pub fn validate_dialog(&self) -> Result<(), ConfigError> {
        if !ConversationState::is_valid_threshold(self.dialog.confidence_threshold) {
            return Err(ConfigError::invalid(
                "dialog.confidence_threshold",
                format!(
                    "Must be a fraction in (0, 1], got {}",
                    self.dialog.confidence_threshold
                ),
            ));
        }
        if self.dialog.top_n == 0 {
            return Err(ConfigError::invalid("dialog.top_n", "Must be at least 1"));
        }
        if self.dialog.prediction_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "dialog.prediction_timeout_ms",
                "Prediction timeout must be positive",
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: default_true(),
            // Empty by default - must be explicitly configured for production
            cors_origins: Vec::new(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

/// Dialog policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Threshold assigned to new conversations
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,

    /// Number of ranked diseases requested from the predictor
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Upper bound on a single prediction call
    #[serde(default = "default_prediction_timeout_ms")]
    pub prediction_timeout_ms: u64,
}

fn default_confidence_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_top_n() -> usize {
    3
}

fn default_prediction_timeout_ms() -> u64 {
    5000
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            top_n: default_top_n(),
            prediction_timeout_ms: default_prediction_timeout_ms(),
        }
    }
}

impl DialogConfig {
    pub fn prediction_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.prediction_timeout_ms)
    }
}

/// Knowledge file paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgePaths {
    #[serde(default = "default_intents_path")]
    pub intents: String,

    #[serde(default = "default_symptoms_path")]
    pub symptoms: String,

    #[serde(default = "default_diseases_path")]
    pub diseases: String,
}

fn default_intents_path() -> String {
    "config/knowledge/intents.yaml".to_string()
}

fn default_symptoms_path() -> String {
    "config/knowledge/symptoms.yaml".to_string()
}

fn default_diseases_path() -> String {
    "config/knowledge/diseases.yaml".to_string()
}

impl Default for KnowledgePaths {
    fn default() -> Self {
        Self {
            intents: default_intents_path(),
            symptoms: default_symptoms_path(),
            diseases: default_diseases_path(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: default_true(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TRIAGE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}
