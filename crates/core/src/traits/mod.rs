//! Capability traits for the triage dialog
//!
//! Every collaborator the dialog depends on sits behind one of these traits so
//! that implementations can be swapped without touching the dialog logic, and
//! replaced with deterministic fakes in tests.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Language understanding:
//!   - IntentClassifier: utterance → intent label
//!   - SymptomExtractor: utterance → extracted symptom entities
//!
//! Prediction:
//!   - DiseasePredictor: symptom set → ranked (disease, probability) list
//!
//! Reply construction:
//!   - Summarizer: conversation → free-text summary for assessments
//! ```

mod nlp;
mod predictor;
mod summary;

pub use nlp::{IntentClassifier, SymptomExtractor};
pub use predictor::DiseasePredictor;
pub use summary::{EmptySummarizer, Summarizer};
