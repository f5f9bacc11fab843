//! Language understanding traits

use async_trait::async_trait;

use crate::{ExtractedEntity, Result};

/// Intent classifier interface
///
/// Must return one label of a fixed vocabulary that includes at least
/// `greeting`, `describe_symptom`, `ask_treatment` and the fallback
/// `unknown`. Must not fail for well-formed non-empty input.
///
/// # Example
///
/// ```ignore
/// let classifier: Arc<dyn IntentClassifier> = Arc::new(IntentDetector::from_config(&intents));
/// let label = classifier.classify("hello there").await?;
/// assert_eq!(label, "greeting");
/// ```
#[async_trait]
pub trait IntentClassifier: Send + Sync + 'static {
    /// Classify an utterance into an intent label
    async fn classify(&self, utterance: &str) -> Result<String>;

    /// Get classifier name for logging
    fn name(&self) -> &str;
}

/// Symptom extractor interface
///
/// Returns the symptom mentions found in an utterance; an empty list is a
/// valid answer.
#[async_trait]
pub trait SymptomExtractor: Send + Sync + 'static {
    /// Extract symptom entities from an utterance
    async fn extract(&self, utterance: &str) -> Result<Vec<ExtractedEntity>>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}
