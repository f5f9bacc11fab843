//! Symptom Triage Dialog
//!
//! Features:
//! - Evidence accumulation across turns (symptom set + transcript)
//! - Prediction adapter over a pluggable disease model
//! - Confidence policy deciding between confirming and finalizing
//! - Templated reply construction with a summary seam
//! - Dialog state machine driving one turn at a time

pub mod dialog;
pub mod evidence;
pub mod policy;
pub mod prediction;
pub mod replies;

pub use dialog::{DialogEngine, TurnOutcome};
pub use evidence::{merge, record_utterance};
pub use policy::{decide, Decision};
pub use prediction::{DiseaseModel, PredictionAdapter, TableDiseaseModel};
pub use replies::ReplyBuilder;

use thiserror::Error;

/// Turn-level failures
///
/// A turn that returns one of these committed nothing; the caller keeps its
/// prior state and may retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Prediction unavailable: {0}")]
    PredictionUnavailable(String),

    #[error("Prediction timed out after {0} ms")]
    PredictionTimeout(u64),

    #[error("Intent classification failed: {0}")]
    Classifier(String),

    #[error("Symptom extraction failed: {0}")]
    Extractor(String),
}

impl AgentError {
    /// Label used for the `outcome` metric dimension
    pub fn kind(&self) -> &'static str {
        match self {
            AgentError::PredictionUnavailable(_) => "prediction_unavailable",
            AgentError::PredictionTimeout(_) => "prediction_timeout",
            AgentError::Classifier(_) => "classifier_error",
            AgentError::Extractor(_) => "extractor_error",
        }
    }
}

impl From<triage_core::Error> for AgentError {
    fn from(err: triage_core::Error) -> Self {
        use triage_core::Error;
        match err {
            Error::PredictionUnavailable(msg) => AgentError::PredictionUnavailable(msg),
            Error::Classifier(msg) => AgentError::Classifier(msg),
            Error::Extractor(msg) => AgentError::Extractor(msg),
            // Recovered inside the turn; reaching here means a collaborator misused it
            Error::NoMatchingEvidence => {
                AgentError::PredictionUnavailable("unexpected missing evidence".to_string())
            },
        }
    }
}
