//! Table-driven reference disease model

use std::collections::HashMap;

use triage_config::DiseaseTable;
use triage_core::{Error, Result};

use super::DiseaseModel;

/// Scores each disease by the fraction of its listed symptoms present
///
/// Scores are independent per disease and do not sum to 1.
pub struct TableDiseaseModel {
    vocabulary: Vec<String>,
    labels: Vec<String>,
    /// Per label, the feature indices of its symptoms
    rows: Vec<Vec<usize>>,
}

impl TableDiseaseModel {
    pub fn from_table(table: &DiseaseTable) -> Self {
        let vocabulary = table.vocabulary();
        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, v)| (v.as_str(), i))
            .collect();

        let mut labels = Vec::with_capacity(table.diseases.len());
        let mut rows = Vec::with_capacity(table.diseases.len());
        for disease in &table.diseases {
            let mut row: Vec<usize> = disease
                .symptoms
                .iter()
                .filter_map(|s| index.get(s.trim().to_lowercase().as_str()).copied())
                .collect();
            row.sort_unstable();
            row.dedup();

            labels.push(disease.name.clone());
            rows.push(row);
        }

        tracing::info!(
            diseases = labels.len(),
            features = vocabulary.len(),
            "Disease table model ready"
        );

        Self {
            vocabulary,
            labels,
            rows,
        }
    }
}

impl DiseaseModel for TableDiseaseModel {
    fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn infer(&self, features: &[f32]) -> Result<Vec<f32>> {
        if features.len() != self.vocabulary.len() {
            return Err(Error::PredictionUnavailable(format!(
                "Expected {} features, got {}",
                self.vocabulary.len(),
                features.len()
            )));
        }

        Ok(self
            .rows
            .iter()
            .map(|row| {
                if row.is_empty() {
                    return 0.0;
                }
                let matched = row.iter().filter(|&&i| features[i] > 0.0).count();
                matched as f32 / row.len() as f32
            })
            .collect())
    }

    fn name(&self) -> &str {
        "disease-table"
    }
}
