//! Ranked disease predictions

use serde::{Deserialize, Serialize};

/// One ranked (disease, probability) entry
///
/// Probabilities are independent per-disease scores in [0, 1]; a ranked
/// list is not required to sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(disease: impl Into<String>, probability: f32) -> Self {
        Self {
            disease: disease.into(),
            probability,
        }
    }

    /// Probability as a percentage with one decimal, e.g. `85.0%`
    pub fn percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_formatting() {
        assert_eq!(Prediction::new("flu", 0.85).percent(), "85.0%");
        assert_eq!(Prediction::new("cold", 0.4).percent(), "40.0%");
        assert_eq!(Prediction::new("rare", 0.0).percent(), "0.0%");
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Prediction::new("flu", 0.5)).unwrap();
        assert_eq!(json["disease"], "flu");
        assert_eq!(json["probability"], 0.5);
    }
}
