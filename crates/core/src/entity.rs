//! Extracted entity records produced by the symptom extractor

use serde::{Deserialize, Serialize};

/// A symptom mention found in an utterance
///
/// Either field may be absent: lexicon-backed extractors usually fill both,
/// span taggers often only know the surface text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Canonical name from the extractor's vocabulary
    #[serde(default)]
    pub preferred_name: Option<String>,
    /// Surface text as it appeared in the utterance
    #[serde(default, rename = "symptom")]
    pub symptom_text: Option<String>,
}

impl ExtractedEntity {
    pub fn new(preferred_name: Option<String>, symptom_text: Option<String>) -> Self {
        Self {
            preferred_name,
            symptom_text,
        }
    }

    /// Entity carrying only a canonical name
    pub fn preferred(name: impl Into<String>) -> Self {
        Self {
            preferred_name: Some(name.into()),
            symptom_text: None,
        }
    }

    /// Entity carrying only surface text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            preferred_name: None,
            symptom_text: Some(text.into()),
        }
    }
}
