//! Knowledge files for the reference collaborators
//!
//! Three YAML documents describe what the bundled intent classifier, symptom
//! extractor and disease model know about. They are loaded once at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use triage_core::IntentLabel;

use crate::{ConfigError, KnowledgePaths};

/// Intent definition with example utterances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentEntry {
    pub name: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// intents.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentsConfig {
    #[serde(default)]
    pub intents: Vec<IntentEntry>,
}

/// Lexicon entry mapping surface forms to one preferred symptom name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub preferred_name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// symptoms.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomLexicon {
    #[serde(default)]
    pub symptoms: Vec<LexiconEntry>,
}

/// Disease row in the reference model table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub name: String,
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// diseases.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiseaseTable {
    #[serde(default)]
    pub diseases: Vec<DiseaseEntry>,
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
    Ok(serde_yaml::from_str(&content)?)
}

impl IntentsConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = read_yaml(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for intent in &self.intents {
            if intent.name.trim().is_empty() {
                return Err(ConfigError::invalid("intents.name", "Intent name is empty"));
            }
            if !seen.insert(intent.name.as_str()) {
                return Err(ConfigError::invalid(
                    "intents.name",
                    format!("Duplicate intent '{}'", intent.name),
                ));
            }
        }

        // An empty file means "use the built-in intents"
        if !self.intents.is_empty() {
            let missing: Vec<&str> = IntentLabel::REQUIRED
                .iter()
                .copied()
                .filter(|label| !seen.contains(label))
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::invalid(
                    "intents",
                    format!("Missing required intents: {}", missing.join(", ")),
                ));
            }
        }
        Ok(())
    }
}

impl SymptomLexicon {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let lexicon: Self = read_yaml(path.as_ref())?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self
            .symptoms
            .iter()
            .find(|e| e.preferred_name.trim().is_empty())
        {
            return Err(ConfigError::invalid(
                "symptoms.preferred_name",
                format!("Empty preferred name (synonyms: {:?})", entry.synonyms),
            ));
        }
        Ok(())
    }
}

impl DiseaseTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let table: Self = read_yaml(path.as_ref())?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.diseases.is_empty() {
            return Err(ConfigError::invalid("diseases", "Disease table is empty"));
        }
        let mut seen = HashSet::new();
        for disease in &self.diseases {
            if !seen.insert(disease.name.trim().to_lowercase()) {
                return Err(ConfigError::invalid(
                    "diseases.name",
                    format!("Duplicate disease '{}'", disease.name),
                ));
            }
            if disease.symptoms.is_empty() {
                return Err(ConfigError::invalid(
                    "diseases.symptoms",
                    format!("Disease '{}' lists no symptoms", disease.name),
                ));
            }
        }
        Ok(())
    }

    /// Ordered union of all symptoms, lower-cased and trimmed
    ///
    /// Order is first appearance in the table, which fixes the feature index
    /// of every symptom.
    pub fn vocabulary(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut vocabulary = Vec::new();
        for symptom in self.diseases.iter().flat_map(|d| d.symptoms.iter()) {
            let token = symptom.trim().to_lowercase();
            if !token.is_empty() && seen.insert(token.clone()) {
                vocabulary.push(token);
            }
        }
        vocabulary
    }
}

/// All knowledge files, loaded together
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    pub intents: IntentsConfig,
    pub symptoms: SymptomLexicon,
    pub diseases: DiseaseTable,
}

impl KnowledgeBase {
    pub fn load(paths: &KnowledgePaths) -> Result<Self, ConfigError> {
        let kb = Self {
            intents: IntentsConfig::load(&paths.intents)?,
            symptoms: SymptomLexicon::load(&paths.symptoms)?,
            diseases: DiseaseTable::load(&paths.diseases)?,
        };

        tracing::info!(
            intents = kb.intents.intents.len(),
            symptoms = kb.symptoms.symptoms.len(),
            diseases = kb.diseases.diseases.len(),
            "Loaded knowledge base"
        );

        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> DiseaseTable {
        serde_yaml::from_str(
            r#"
diseases:
  - name: flu
    symptoms: [Fever, cough, "body ache"]
  - name: cold
    symptoms: [cough, " runny nose"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_vocabulary_is_ordered_union() {
        let table = sample_table();
        assert_eq!(
            table.vocabulary(),
            vec!["fever", "cough", "body ache", "runny nose"]
        );
    }

    #[test]
    fn test_duplicate_disease_rejected() {
        let mut table = sample_table();
        table.diseases.push(DiseaseEntry {
            name: "Flu".into(),
            symptoms: vec!["fever".into()],
        });
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(DiseaseTable::default().validate().is_err());
    }

    #[test]
    fn test_duplicate_intent_rejected() {
        let config: IntentsConfig = serde_yaml::from_str(
            r#"
intents:
  - name: greeting
    examples: [hello]
  - name: greeting
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_required_intents() {
        let farewell_only = IntentsConfig {
            intents: vec![IntentEntry {
                name: "farewell".into(),
                examples: vec!["bye".into()],
            }],
        };
        let err = farewell_only.validate().unwrap_err();
        assert!(err.to_string().contains("greeting, describe_symptom, ask_treatment"));

        assert!(IntentsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let write = |name: &str, body: &str| {
            let path = dir.path().join(name);
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(body.as_bytes()).unwrap();
            path.display().to_string()
        };

        let paths = KnowledgePaths {
            intents: write(
                "intents.yaml",
                "intents:\n  - name: greeting\n    examples: [hi]\n  - name: describe_symptom\n  - name: ask_treatment\n",
            ),
            symptoms: write(
                "symptoms.yaml",
                "symptoms:\n  - preferred_name: fever\n    synonyms: [high temperature]\n",
            ),
            diseases: write(
                "diseases.yaml",
                "diseases:\n  - name: flu\n    symptoms: [fever]\n",
            ),
        };

        let kb = KnowledgeBase::load(&paths).unwrap();
        assert_eq!(kb.intents.intents[0].name, "greeting");
        assert_eq!(kb.symptoms.symptoms[0].synonyms, vec!["high temperature"]);
        assert_eq!(kb.diseases.vocabulary(), vec!["fever"]);
    }

    #[test]
    fn test_missing_file() {
        let err = DiseaseTable::load("/nonexistent/diseases.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
