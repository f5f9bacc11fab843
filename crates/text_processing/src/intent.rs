//! Intent Detection
//!
//! Example-driven intent detector used as the reference `IntentClassifier`.
//! Intents and their example utterances come from intents.yaml; a built-in
//! set covering the labels the dialog dispatches on is used when no config
//! is supplied.
//!
//! # Example
//!
//! ```
//! use triage_text_processing::IntentDetector;
//!
//! let detector = IntentDetector::new();
//! let result = detector.detect("Hello");
//!
//! assert_eq!(result.intent, "greeting");
//! ```

use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

use triage_config::{IntentEntry, IntentsConfig};
use triage_core::{IntentClassifier, IntentLabel, Result};

/// Scores below this fall back to `unknown`
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// Detected intent with score and runner-ups
#[derive(Debug, Clone)]
pub struct DetectedIntent {
    /// Intent name
    pub intent: String,
    /// Confidence score
    pub confidence: f32,
    /// Alternative intents
    pub alternatives: Vec<(String, f32)>,
}

impl DetectedIntent {
    fn unknown() -> Self {
        Self {
            intent: IntentLabel::UNKNOWN.to_string(),
            confidence: 0.0,
            alternatives: Vec::new(),
        }
    }
}

/// Intent detector
pub struct IntentDetector {
    intents: RwLock<Vec<IntentEntry>>,
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentDetector {
    /// Create a detector with the built-in triage intents
    pub fn new() -> Self {
        Self::with_intents(core_intents())
    }

    /// Create a detector with custom intents
    pub fn with_intents(intents: Vec<IntentEntry>) -> Self {
        Self {
            intents: RwLock::new(intents),
        }
    }

    /// Create a detector from intents.yaml
    ///
    /// Built-in entries stand in for any dialog label the config lacks, so
    /// every dialog branch stays reachable.
    pub fn from_config(config: &IntentsConfig) -> Self {
        if config.intents.is_empty() {
            tracing::warn!("No intents configured, using built-in triage intents");
            return Self::new();
        }

        let mut intents = config.intents.clone();
        for builtin in core_intents() {
            if !intents.iter().any(|i| i.name == builtin.name) {
                tracing::warn!(intent = %builtin.name, "Intent missing from config, using built-in examples");
                intents.push(builtin);
            }
        }
        Self::with_intents(intents)
    }

    /// Replace all intents with new ones
    pub fn set_intents(&self, new_intents: Vec<IntentEntry>) {
        *self.intents.write() = new_intents;
    }

    /// Detect intent from text
    pub fn detect(&self, text: &str) -> DetectedIntent {
        let text_lower = text.trim().to_lowercase();
        if text_lower.is_empty() {
            return DetectedIntent::unknown();
        }

        let intents = self.intents.read();
        let mut scores: Vec<(String, f32)> = intents
            .iter()
            .map(|intent| (intent.name.clone(), intent_score(&text_lower, intent)))
            .collect();

        // Stable sort keeps config order on ties
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        match scores.first().cloned() {
            Some((best_intent, best_score)) if best_score >= DEFAULT_MIN_CONFIDENCE => {
                DetectedIntent {
                    intent: best_intent,
                    confidence: best_score,
                    alternatives: scores.into_iter().skip(1).take(3).collect(),
                }
            },
            _ => DetectedIntent {
                alternatives: scores.into_iter().take(3).collect(),
                ..DetectedIntent::unknown()
            },
        }
    }
}

/// Calculate intent match score
///
/// Exact example match scores 1.0, a contained example 0.9, otherwise the
/// best word overlap ratio scaled to 0.8. Word boundaries follow Unicode
/// segmentation rather than plain whitespace.
fn intent_score(text: &str, intent: &IntentEntry) -> f32 {
    let mut score: f32 = 0.0;
    let text_words: HashSet<&str> = text.unicode_words().collect();
    let text_padded = padded_words(text);

    for example in &intent.examples {
        let example_lower = example.to_lowercase();

        if text == example_lower {
            return 1.0;
        }

        // Whole-word containment: "hi" must not match inside "this"
        if text_padded.contains(&padded_words(&example_lower)) {
            score = score.max(0.9);
        }

        let example_words: HashSet<&str> = example_lower.unicode_words().collect();
        let overlap = example_words.intersection(&text_words).count();
        if overlap > 0 {
            let overlap_score = overlap as f32 / example_words.len().max(1) as f32;
            score = score.max(overlap_score * 0.8);
        }
    }

    score
}

/// Words joined by single spaces, with a space on both ends
fn padded_words(text: &str) -> String {
    let joined: Vec<&str> = text.unicode_words().collect();
    format!(" {} ", joined.join(" "))
}

fn entry(name: &str, examples: &[&str]) -> IntentEntry {
    IntentEntry {
        name: name.to_string(),
        examples: examples.iter().map(|e| e.to_string()).collect(),
    }
}

/// Built-in intents for the triage dialog
fn core_intents() -> Vec<IntentEntry> {
    vec![
        entry(
            IntentLabel::GREETING,
            &["hello", "hi", "hey", "good morning", "good evening"],
        ),
        entry(
            IntentLabel::DESCRIBE_SYMPTOM,
            &[
                "I have a fever",
                "I feel sick",
                "my head hurts",
                "I have been coughing",
                "I am experiencing pain",
                "I have a sore throat",
            ],
        ),
        entry(
            IntentLabel::ASK_TREATMENT,
            &[
                "what is the treatment",
                "how do I treat it",
                "what medicine should I take",
                "how can I get better",
            ],
        ),
    ]
}

#[async_trait]
impl IntentClassifier for IntentDetector {
    async fn classify(&self, utterance: &str) -> Result<String> {
        let detected = self.detect(utterance);
        tracing::debug!(
            intent = %detected.intent,
            confidence = detected.confidence,
            alternatives = ?detected.alternatives,
            "Intent detected"
        );
        Ok(detected.intent)
    }

    fn name(&self) -> &str {
        "example-intent-detector"
    }
}
