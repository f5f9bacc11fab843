//! Dialog state machine
//!
//! One call to [`DialogEngine::handle_turn`] is one turn. The engine reads
//! the caller's prior state, works on its own copy, and hands back a new
//! state only when the whole turn succeeded:
//!
//! ```text
//! AWAITING_CONFIRMATION + "yes"  → ask for more symptoms   → AWAITING_SYMPTOMS
//! AWAITING_CONFIRMATION + "no"   → final assessment/close  → FREE
//! AWAITING_SYMPTOMS     + any    → extract, merge, predict → FREE | AWAITING_CONFIRMATION
//! FREE (or other input)          → classify intent, dispatch
//! ```
//!
//! Nothing here is shared between conversations; concurrent turns for the
//! same conversation must be serialized by the caller.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use triage_config::{DialogConfig, RepliesConfig};
use triage_core::{
    ConversationState, DialogPhase, DiseasePredictor, IntentClassifier, IntentLabel,
    Prediction, Summarizer, SymptomExtractor,
};
use triage_text_processing::normalize_entities;

use crate::evidence::{merge, record_utterance};
use crate::policy::{decide, Decision};
use crate::replies::ReplyBuilder;
use crate::AgentError;

/// Result of a successful turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub reply: String,
    /// Last classified intent (carried over when this turn did not classify)
    pub intent: Option<String>,
    pub state: ConversationState,
    /// Policy decision, when this turn ran one
    pub decision: Option<Decision>,
}

/// What the evidence step produced
enum Assessment {
    /// Extractor found nothing in the utterance
    NothingExtracted,
    /// Symptoms were extracted but the model knows none of them
    NoMatchingEvidence,
    Decided { reply: String, decision: Decision },
}

pub struct DialogEngine {
    classifier: Arc<dyn IntentClassifier>,
    extractor: Arc<dyn SymptomExtractor>,
    predictor: Arc<dyn DiseasePredictor>,
    replies: ReplyBuilder,
    config: DialogConfig,
}

impl DialogEngine {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        extractor: Arc<dyn SymptomExtractor>,
        predictor: Arc<dyn DiseasePredictor>,
        config: DialogConfig,
        replies: RepliesConfig,
    ) -> Self {
        tracing::info!(
            classifier = classifier.name(),
            extractor = extractor.name(),
            model = predictor.model_name(),
            top_n = config.top_n,
            "Dialog engine created"
        );
        Self {
            classifier,
            extractor,
            predictor,
            replies: ReplyBuilder::new(replies),
            config,
        }
    }

    /// Replace the default empty summarizer
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.replies = self.replies.with_summarizer(summarizer);
        self
    }

    /// Process one user utterance against the prior state
    ///
    /// On error nothing is committed: `prior` is untouched and the turn can be
    /// retried as if it never started.
    pub async fn handle_turn(
        &self,
        prior: &ConversationState,
        utterance: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let span = tracing::info_span!(
            "turn",
            turn_id = %Uuid::new_v4(),
            phase = prior.phase().as_str(),
            turn = prior.turn_count(),
        );

        let result = self.run_turn(prior.clone(), utterance).instrument(span).await;

        match &result {
            Ok(outcome) => {
                metrics::counter!("triage_turns_total", "outcome" => "ok").increment(1);
                tracing::debug!(
                    phase = outcome.state.phase().as_str(),
                    symptoms = outcome.state.symptoms.len(),
                    finalized = outcome.state.final_assessment_delivered,
                    "Turn complete"
                );
            },
            Err(e) => {
                metrics::counter!("triage_turns_total", "outcome" => e.kind()).increment(1);
                tracing::warn!(error = %e, "Turn failed, prior state kept");
            },
        }

        result
    }

    async fn run_turn(
        &self,
        mut state: ConversationState,
        utterance: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let utterance = utterance.trim();
        let normalized = utterance.to_lowercase();
        record_utterance(&mut state, utterance);

        let mut decision = None;
        let reply = match (state.phase(), normalized.as_str()) {
            (DialogPhase::AwaitingConfirmation, "yes") => {
                state.set_phase(DialogPhase::AwaitingSymptoms);
                self.replies.describe_more()
            },
            (DialogPhase::AwaitingConfirmation, "no") => self.answer_no(&mut state),
            (DialogPhase::AwaitingSymptoms, _) => {
                match self.assess(&mut state, &normalized, false).await? {
                    Assessment::Decided { reply, decision: d } => {
                        decision = Some(d);
                        reply
                    },
                    Assessment::NothingExtracted | Assessment::NoMatchingEvidence => {
                        self.replies.not_recognized()
                    },
                }
            },
            _ => self.dispatch_intent(&mut state, &normalized, &mut decision).await?,
        };

        Ok(TurnOutcome {
            reply,
            intent: state.intent.clone(),
            state,
            decision,
        })
    }

    /// "no" to the confirmation question
    fn answer_no(&self, state: &mut ConversationState) -> String {
        let reply = if state.final_assessment_delivered {
            self.replies.closing()
        } else {
            match state.top_prediction().cloned() {
                Some(top) => {
                    let reply = self.replies.final_assessment(state, &top);
                    state.mark_finalized();
                    tracing::info!(disease = %top.disease, "Final assessment after declined confirmation");
                    reply
                },
                // Nothing was ever predicted, so nothing is delivered
                None => self.replies.closing(),
            }
        };
        state.set_phase(DialogPhase::Free);
        reply
    }

    async fn dispatch_intent(
        &self,
        state: &mut ConversationState,
        utterance: &str,
        decision: &mut Option<Decision>,
    ) -> Result<String, AgentError> {
        let label = self.classifier.classify(utterance).await?;
        tracing::debug!(intent = %label, "Intent classified");
        state.intent = Some(label.clone());

        let reply = match IntentLabel::from_label(&label) {
            IntentLabel::Greeting => {
                state.set_phase(DialogPhase::AwaitingSymptoms);
                self.replies.greeting()
            },
            IntentLabel::DescribeSymptom => match self.assess(state, utterance, true).await? {
                Assessment::Decided { reply, decision: d } => {
                    *decision = Some(d);
                    reply
                },
                Assessment::NothingExtracted => {
                    state.set_phase(DialogPhase::AwaitingSymptoms);
                    self.replies.not_recognized()
                },
                Assessment::NoMatchingEvidence => self.replies.not_recognized(),
            },
            IntentLabel::AskTreatment => match state.top_prediction().cloned() {
                Some(top) => self.replies.treatment_referral(state, &top),
                None => {
                    state.set_phase(DialogPhase::AwaitingSymptoms);
                    self.replies.symptoms_first()
                },
            },
            IntentLabel::Unknown | IntentLabel::Other(_) => self.replies.not_understood(),
        };

        Ok(reply)
    }

    /// Extract, merge, predict and decide
    ///
    /// `state` is only written when a decision was reached; the two
    /// "not recognized" outcomes leave it as it was.
    async fn assess(
        &self,
        state: &mut ConversationState,
        utterance: &str,
        list_recognized: bool,
    ) -> Result<Assessment, AgentError> {
        let entities = self.extractor.extract(utterance).await?;
        let new_symptoms = normalize_entities(&entities);
        if new_symptoms.is_empty() {
            tracing::debug!("No symptoms recognized in utterance");
            return Ok(Assessment::NothingExtracted);
        }

        let mut candidate = state.clone();
        let added = merge(&mut candidate, &new_symptoms);

        let predictions = if !added && !candidate.last_predictions.is_empty() {
            tracing::debug!("No new symptoms, reusing previous ranking");
            candidate.last_predictions.clone()
        } else {
            match self.predict(&candidate.symptoms).await? {
                Some(predictions) => predictions,
                None => return Ok(Assessment::NoMatchingEvidence),
            }
        };

        let decision = decide(&predictions, candidate.confidence_threshold);
        metrics::counter!("triage_decisions_total", "decision" => decision.as_str()).increment(1);
        tracing::info!(
            decision = decision.as_str(),
            top = %predictions[0].disease,
            probability = predictions[0].probability,
            threshold = candidate.confidence_threshold,
            "Confidence policy applied"
        );

        candidate.last_predictions = predictions;

        let mut lines = Vec::new();
        if list_recognized {
            lines.push(self.replies.recognized(&candidate.symptoms));
        }
        lines.extend(self.replies.ranked(&candidate.last_predictions));

        match decision {
            Decision::Finalize => {
                let top = candidate.last_predictions[0].clone();
                lines.push(self.replies.final_assessment(&candidate, &top));
                candidate.mark_finalized();
                candidate.set_phase(DialogPhase::Free);
            },
            Decision::Confirm => {
                lines.push(self.replies.confirm_question());
                candidate.set_phase(DialogPhase::AwaitingConfirmation);
            },
        }

        *state = candidate;
        Ok(Assessment::Decided {
            reply: lines.join("\n"),
            decision,
        })
    }

    /// Bounded predictor call; `None` when the model recognizes no symptom
    async fn predict(
        &self,
        symptoms: &BTreeSet<String>,
    ) -> Result<Option<Vec<Prediction>>, AgentError> {
        let started = Instant::now();
        let result = tokio::time::timeout(
            self.config.prediction_timeout(),
            self.predictor.predict(symptoms, self.config.top_n),
        )
        .await;
        metrics::histogram!("triage_prediction_latency_seconds")
            .record(started.elapsed().as_secs_f64());

        match result {
            Err(_) => Err(AgentError::PredictionTimeout(self.config.prediction_timeout_ms)),
            Ok(Err(e)) if e.is_recoverable() => {
                tracing::info!(symptoms = ?symptoms, "Model recognizes none of the symptoms");
                Ok(None)
            },
            Ok(Err(e)) => Err(e.into()),
            Ok(Ok(predictions)) if predictions.is_empty() => {
                tracing::warn!(
                    model = self.predictor.model_name(),
                    "Predictor returned an empty ranking, treating as no matching evidence"
                );
                Ok(None)
            },
            Ok(Ok(predictions)) => Ok(Some(predictions)),
        }
    }
}
