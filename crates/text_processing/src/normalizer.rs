//! Symptom normalization
//!
//! Turns extractor output into the token form the rest of the dialog works
//! with: lower-cased, trimmed, deduplicated.

use std::collections::BTreeSet;

use triage_core::ExtractedEntity;

/// Normalize a single mention; `None` when nothing is left after trimming
pub fn normalize_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Union of the normalized `preferred_name` and `symptom_text` of every entity
///
/// Pure and deterministic. Each entity contributes at most two tokens; an
/// empty input yields an empty set.
pub fn normalize_entities(entities: &[ExtractedEntity]) -> BTreeSet<String> {
    entities
        .iter()
        .flat_map(|e| [e.preferred_name.as_deref(), e.symptom_text.as_deref()])
        .flatten()
        .filter_map(normalize_token)
        .collect()
}
