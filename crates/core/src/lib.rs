//! Core traits and types for the symptom triage dialog
//!
//! This crate provides the foundational types shared by every other crate:
//! - `ConversationState`, the single canonical per-conversation value
//! - Prediction and extraction records exchanged with collaborators
//! - Capability traits for the pluggable collaborators (intent classifier,
//!   symptom extractor, disease predictor, summarizer)
//! - Error types

pub mod entity;
pub mod error;
pub mod intent;
pub mod prediction;
pub mod state;
pub mod traits;

pub use entity::ExtractedEntity;
pub use error::{Error, Result};
pub use intent::IntentLabel;
pub use prediction::Prediction;
pub use state::{ConversationState, DialogPhase, DEFAULT_CONFIDENCE_THRESHOLD};

pub use traits::{
    DiseasePredictor, EmptySummarizer, IntentClassifier, Summarizer, SymptomExtractor,
};
