//! Prediction adapter
//!
//! Isolates the dialog from how a disease model wants its input. A model sees
//! a binary feature vector over its own symptom vocabulary and answers with
//! one score per disease label; the adapter does the encoding, detects the
//! "nothing known" case and turns raw scores into a ranked list.

mod table;

pub use table::TableDiseaseModel;

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use triage_core::{DiseasePredictor, Error, Prediction, Result};

/// Raw disease model
///
/// `infer` may block; the adapter runs it off the async executor.
pub trait DiseaseModel: Send + Sync + 'static {
    /// Feature names, lower-cased; index `i` is feature `i` of the input vector
    fn vocabulary(&self) -> &[String];

    /// Disease labels in native output order
    fn labels(&self) -> &[String];

    /// One independent score in [0, 1] per label
    fn infer(&self, features: &[f32]) -> Result<Vec<f32>>;

    fn name(&self) -> &str;
}

/// `DiseasePredictor` over any [`DiseaseModel`]
pub struct PredictionAdapter<M: DiseaseModel> {
    model: Arc<M>,
}

impl<M: DiseaseModel> PredictionAdapter<M> {
    pub fn new(model: M) -> Self {
        Self {
            model: Arc::new(model),
        }
    }

    /// Binary feature vector plus the number of recognized features
    pub fn encode(&self, symptoms: &BTreeSet<String>) -> (Vec<f32>, usize) {
        let vocabulary = self.model.vocabulary();
        let mut features = vec![0.0f32; vocabulary.len()];
        let mut found = 0;

        for symptom in symptoms {
            let token = symptom.trim().to_lowercase();
            if let Some(idx) = vocabulary.iter().position(|v| *v == token) {
                if features[idx] == 0.0 {
                    features[idx] = 1.0;
                    found += 1;
                }
            }
        }

        (features, found)
    }
}

/// Stable descending ranking, cut to `top_n`
fn rank(labels: &[String], scores: &[f32], top_n: usize) -> Result<Vec<Prediction>> {
    if scores.len() != labels.len() {
        return Err(Error::PredictionUnavailable(format!(
            "Model returned {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }
    // Also catches NaN and infinities
    if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
        return Err(Error::PredictionUnavailable(format!(
            "Model returned score {} outside [0, 1]",
            bad
        )));
    }

    let mut ranked: Vec<Prediction> = labels
        .iter()
        .zip(scores)
        .map(|(label, score)| Prediction::new(label.clone(), *score))
        .collect();

    // sort_by is stable: equal scores keep native output order
    ranked.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(top_n);
    Ok(ranked)
}

#[async_trait]
impl<M: DiseaseModel> DiseasePredictor for PredictionAdapter<M> {
    async fn predict(&self, symptoms: &BTreeSet<String>, top_n: usize) -> Result<Vec<Prediction>> {
        let (features, found) = self.encode(symptoms);
        if found == 0 {
            tracing::debug!(
                symptoms = ?symptoms,
                model = self.model.name(),
                "No symptom maps to the model vocabulary"
            );
            return Err(Error::NoMatchingEvidence);
        }

        let model = Arc::clone(&self.model);
        let scores = tokio::task::spawn_blocking(move || model.infer(&features))
            .await
            .map_err(|e| Error::PredictionUnavailable(format!("Inference task failed: {}", e)))??;

        let ranked = rank(self.model.labels(), &scores, top_n)?;
        tracing::debug!(
            recognized = found,
            top = ?ranked.first().map(|p| (&p.disease, p.probability)),
            "Prediction complete"
        );
        Ok(ranked)
    }

    fn model_name(&self) -> &str {
        self.model.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel {
        vocabulary: Vec<String>,
        labels: Vec<String>,
        scores: Vec<f32>,
    }

    impl FixedModel {
        fn new(vocabulary: &[&str], ranked: &[(&str, f32)]) -> Self {
            Self {
                vocabulary: vocabulary.iter().map(|s| s.to_string()).collect(),
                labels: ranked.iter().map(|(l, _)| l.to_string()).collect(),
                scores: ranked.iter().map(|(_, s)| *s).collect(),
            }
        }
    }

    impl DiseaseModel for FixedModel {
        fn vocabulary(&self) -> &[String] {
            &self.vocabulary
        }

        fn labels(&self) -> &[String] {
            &self.labels
        }

        fn infer(&self, _features: &[f32]) -> Result<Vec<f32>> {
            Ok(self.scores.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode() {
        let adapter = PredictionAdapter::new(FixedModel::new(&["fever", "cough", "rash"], &[]));
        let (features, found) = adapter.encode(&set(&["rash", "Fever ", "sneezing"]));
        assert_eq!(features, vec![1.0, 0.0, 1.0]);
        assert_eq!(found, 2);
    }

    #[tokio::test]
    async fn test_no_matching_evidence() {
        let adapter = PredictionAdapter::new(FixedModel::new(&["fever"], &[("flu", 0.9)]));
        let err = adapter.predict(&set(&["sneezing"]), 3).await.unwrap_err();
        assert_eq!(err, Error::NoMatchingEvidence);
    }

    #[tokio::test]
    async fn test_ranking_is_stable_and_truncated() {
        let model = FixedModel::new(
            &["fever"],
            &[("a", 0.2), ("b", 0.6), ("c", 0.6), ("d", 0.9), ("e", 0.1)],
        );
        let adapter = PredictionAdapter::new(model);
        let ranked = adapter.predict(&set(&["fever"]), 3).await.unwrap();

        let names: Vec<&str> = ranked.iter().map(|p| p.disease.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "c"]);
    }

    #[test]
    fn test_score_count_mismatch() {
        let labels = vec!["flu".to_string(), "cold".to_string()];
        let err = rank(&labels, &[0.5], 3).unwrap_err();
        assert!(matches!(err, Error::PredictionUnavailable(_)));
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let labels = vec!["flu".to_string()];
        assert!(rank(&labels, &[f32::NAN], 3).is_err());
        assert!(rank(&labels, &[f32::INFINITY], 3).is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_score_rejected() {
        let adapter = PredictionAdapter::new(FixedModel::new(
            &["fever"],
            &[("flu", 1.4), ("cold", 0.2)],
        ));
        let err = adapter.predict(&set(&["fever"]), 3).await.unwrap_err();
        assert!(matches!(err, Error::PredictionUnavailable(msg) if msg.contains("outside [0, 1]")));

        let labels = vec!["flu".to_string(), "cold".to_string()];
        assert!(rank(&labels, &[0.5, -0.01], 3).is_err());
        assert_eq!(rank(&labels, &[0.0, 1.0], 3).unwrap()[0].disease, "cold");
    }
}
