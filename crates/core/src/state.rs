//! Conversation state
//!
//! `ConversationState` is the only value that survives between turns. The
//! caller owns it and hands it back on every turn; the dialog engine never
//! keeps a copy. Each turn consumes the prior value and yields a new one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::Prediction;

/// Default minimum top-1 probability for finalizing without confirmation
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Sub-state of the dialog, derived from the two awaiting flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogPhase {
    /// Not waiting for anything specific; the next turn is intent-classified
    #[default]
    Free,
    /// A symptom description was requested
    AwaitingSymptoms,
    /// A yes/no disambiguation question was asked
    AwaitingConfirmation,
}

impl DialogPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogPhase::Free => "free",
            DialogPhase::AwaitingSymptoms => "awaiting_symptoms",
            DialogPhase::AwaitingConfirmation => "awaiting_confirmation",
        }
    }
}

/// Per-conversation dialog state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Utterances in arrival order; append-only, used for summaries only
    #[serde(default)]
    pub transcript: Vec<String>,
    /// Normalized symptom tokens accumulated over the conversation
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
    /// Ranking from the most recent prediction, descending by probability
    #[serde(default)]
    pub last_predictions: Vec<Prediction>,
    /// Last classified intent label
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub awaiting_confirmation: bool,
    #[serde(default)]
    pub awaiting_symptoms: bool,
    /// Set once a terminal assessment was delivered; never cleared
    #[serde(default)]
    pub final_assessment_delivered: bool,
    /// Fixed at conversation start
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f32,
}

fn default_threshold() -> f32 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}

impl ConversationState {
    /// Fresh conversation with the given confidence threshold
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            transcript: Vec::new(),
            symptoms: BTreeSet::new(),
            last_predictions: Vec::new(),
            intent: None,
            awaiting_confirmation: false,
            awaiting_symptoms: false,
            final_assessment_delivered: false,
            confidence_threshold,
        }
    }

    /// Continue from the caller's prior state, or start over
    ///
    /// An absent prior state, or one that violates the state invariants,
    /// starts a new conversation with `default_threshold`.
    pub fn resume(prior: Option<ConversationState>, default_threshold: f32) -> Self {
        match prior {
            Some(state) if state.is_well_formed() => state,
            Some(state) => {
                tracing::warn!(
                    awaiting_confirmation = state.awaiting_confirmation,
                    awaiting_symptoms = state.awaiting_symptoms,
                    threshold = state.confidence_threshold,
                    "Discarding malformed dialog state, starting new conversation"
                );
                Self::new(default_threshold)
            },
            None => Self::new(default_threshold),
        }
    }

    /// Whether a threshold is a fraction in (0, 1]
    pub fn is_valid_threshold(threshold: f32) -> bool {
        threshold.is_finite() && threshold > 0.0 && threshold <= 1.0
    }

    /// Check the structural invariants a round-tripped state must satisfy
    pub fn is_well_formed(&self) -> bool {
        Self::is_valid_threshold(self.confidence_threshold)
            && !(self.awaiting_confirmation && self.awaiting_symptoms)
            && self
                .last_predictions
                .iter()
                .all(|p| (0.0..=1.0).contains(&p.probability))
            && self
                .last_predictions
                .windows(2)
                .all(|pair| pair[0].probability >= pair[1].probability)
    }

    pub fn phase(&self) -> DialogPhase {
        if self.awaiting_confirmation {
            DialogPhase::AwaitingConfirmation
        } else if self.awaiting_symptoms {
            DialogPhase::AwaitingSymptoms
        } else {
            DialogPhase::Free
        }
    }

    /// Enter a sub-state, writing both flags together
    pub fn set_phase(&mut self, phase: DialogPhase) {
        self.awaiting_confirmation = phase == DialogPhase::AwaitingConfirmation;
        self.awaiting_symptoms = phase == DialogPhase::AwaitingSymptoms;
    }

    pub fn top_prediction(&self) -> Option<&Prediction> {
        self.last_predictions.first()
    }

    /// Record delivery of a terminal assessment (monotonic)
    pub fn mark_finalized(&mut self) {
        self.final_assessment_delivered = true;
    }

    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }
}
