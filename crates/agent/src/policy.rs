//! Confidence policy
//!
//! The only place in the dialog that looks at a probability.

use triage_core::Prediction;

/// What to do with a ranked prediction list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Top prediction is confident enough to deliver an assessment
    Finalize,
    /// Ask the user for more symptoms first
    Confirm,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Finalize => "finalize",
            Decision::Confirm => "confirm",
        }
    }
}

/// Finalize when the top probability reaches `threshold`, otherwise confirm
///
/// `predictions` must be non-empty and sorted descending; an empty list is
/// treated as no confidence at all.
pub fn decide(predictions: &[Prediction], threshold: f32) -> Decision {
    match predictions.first() {
        Some(top) if top.probability >= threshold => Decision::Finalize,
        _ => Decision::Confirm,
    }
}
