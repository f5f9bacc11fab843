//! Lexicon-driven symptom extraction
//!
//! Every synonym in symptoms.yaml (and the preferred name itself) is compiled
//! into a case-insensitive, word-bounded pattern. A match yields the preferred
//! name together with the text as it appeared in the utterance.

use async_trait::async_trait;
use regex::Regex;

use triage_config::SymptomLexicon;
use triage_core::{Error, ExtractedEntity, Result, SymptomExtractor};

struct SymptomPattern {
    preferred_name: String,
    regex: Regex,
}

/// Reference `SymptomExtractor` backed by a synonym lexicon
pub struct LexiconSymptomExtractor {
    patterns: Vec<SymptomPattern>,
}

impl LexiconSymptomExtractor {
    /// Compile patterns for every lexicon entry
    pub fn from_lexicon(lexicon: &SymptomLexicon) -> Result<Self> {
        let mut patterns = Vec::new();

        for entry in &lexicon.symptoms {
            let surface_forms = std::iter::once(&entry.preferred_name).chain(entry.synonyms.iter());
            for form in surface_forms {
                let form = form.trim();
                if form.is_empty() {
                    continue;
                }
                let regex = Regex::new(&word_pattern(form))
                    .map_err(|e| Error::Extractor(format!("Invalid pattern for '{}': {}", form, e)))?;
                patterns.push(SymptomPattern {
                    preferred_name: entry.preferred_name.trim().to_string(),
                    regex,
                });
            }
        }

        tracing::debug!(patterns = patterns.len(), "Compiled symptom lexicon");
        Ok(Self { patterns })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// All lexicon matches in an utterance, in lexicon order
    pub fn find(&self, utterance: &str) -> Vec<ExtractedEntity> {
        self.patterns
            .iter()
            .flat_map(|pattern| {
                pattern.regex.find_iter(utterance).map(|m| {
                    ExtractedEntity::new(
                        Some(pattern.preferred_name.clone()),
                        Some(m.as_str().to_string()),
                    )
                })
            })
            .collect()
    }
}

/// Case-insensitive literal with `\b` on each end that starts or ends in a word character
fn word_pattern(form: &str) -> String {
    let is_word = |c: Option<char>| c.map_or(false, |c| c.is_alphanumeric() || c == '_');
    let start = if is_word(form.chars().next()) { r"\b" } else { "" };
    let end = if is_word(form.chars().last()) { r"\b" } else { "" };
    format!("(?i){}{}{}", start, regex::escape(form), end)
}

#[async_trait]
impl SymptomExtractor for LexiconSymptomExtractor {
    async fn extract(&self, utterance: &str) -> Result<Vec<ExtractedEntity>> {
        let entities = self.find(utterance);
        tracing::debug!(found = entities.len(), "Symptoms extracted");
        Ok(entities)
    }

    fn name(&self) -> &str {
        "lexicon-symptom-extractor"
    }
}
