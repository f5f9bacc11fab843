//! Configuration management for the symptom triage service
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (TRIAGE_ prefix, `__` separator)
//!
//! # Knowledge Files
//!
//! The reference collaborators read their vocabularies from YAML files whose
//! paths live in `Settings::knowledge`:
//! - intents.yaml - intent labels with example utterances
//! - symptoms.yaml - symptom lexicon (preferred names and synonyms)
//! - diseases.yaml - disease/symptom table for the reference model

pub mod knowledge;
pub mod replies;
pub mod settings;

pub use knowledge::{
    DiseaseEntry, DiseaseTable, IntentEntry, IntentsConfig, KnowledgeBase, LexiconEntry,
    SymptomLexicon,
};
pub use replies::{render, RepliesConfig};
pub use settings::{
    load_settings, DialogConfig, KnowledgePaths, ObservabilityConfig, RuntimeEnvironment,
    ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
