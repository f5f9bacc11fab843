//! Disease prediction trait

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::{Prediction, Result};

/// Disease predictor interface
///
/// # Contract
///
/// - Returns at most `top_n` entries sorted by descending probability. Ties
///   keep the model's native output order.
/// - Fails with [`Error::NoMatchingEvidence`](crate::Error::NoMatchingEvidence)
///   when none of the symptoms is part of the model's vocabulary. An empty
///   list is never used to signal this.
/// - Fails with [`Error::PredictionUnavailable`](crate::Error::PredictionUnavailable)
///   when the model cannot be invoked.
///
/// Inference may block; callers put their timeout around this call.
#[async_trait]
pub trait DiseasePredictor: Send + Sync + 'static {
    /// Rank diseases for the given symptom set
    async fn predict(&self, symptoms: &BTreeSet<String>, top_n: usize) -> Result<Vec<Prediction>>;

    /// Get model name for logging
    fn model_name(&self) -> &str;
}
