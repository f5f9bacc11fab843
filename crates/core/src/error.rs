//! Error types shared by the capability traits

use thiserror::Error;

/// Errors raised by collaborators behind the core traits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// None of the provided symptoms is part of the model's feature vocabulary
    #[error("No matching evidence: none of the symptoms is known to the model")]
    NoMatchingEvidence,

    /// The prediction model could not be loaded or invoked
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),

    #[error("Intent classification failed: {0}")]
    Classifier(String),

    #[error("Symptom extraction failed: {0}")]
    Extractor(String),
}

impl Error {
    /// Whether the dialog can answer conversationally instead of failing the turn
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoMatchingEvidence)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
