//! Text processing for the triage dialog
//!
//! This crate provides:
//! - **Symptom Normalization**: canonicalize extracted mentions into a
//!   deduplicated token set
//! - **Intent Detection**: example-driven reference `IntentClassifier`
//! - **Symptom Extraction**: lexicon-driven reference `SymptomExtractor`
//!
//! # Example
//!
//! ```ignore
//! use triage_text_processing::{normalize_entities, LexiconSymptomExtractor};
//!
//! let extractor = LexiconSymptomExtractor::from_lexicon(&kb.symptoms)?;
//! let entities = extractor.extract("I have a high temperature").await?;
//! let symptoms = normalize_entities(&entities);
//! ```

pub mod intent;
pub mod normalizer;
pub mod symptoms;

pub use intent::{IntentDetector, DEFAULT_MIN_CONFIDENCE};
pub use normalizer::{normalize_entities, normalize_token};
pub use symptoms::LexiconSymptomExtractor;
