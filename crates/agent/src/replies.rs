//! Reply construction
//!
//! Fills the configured templates. The `{summary}` placeholder is supplied by
//! the injected [`Summarizer`].

use std::collections::BTreeSet;
use std::sync::Arc;

use triage_config::{render, RepliesConfig};
use triage_core::{ConversationState, EmptySummarizer, Prediction, Summarizer};

pub struct ReplyBuilder {
    templates: RepliesConfig,
    summarizer: Arc<dyn Summarizer>,
}

impl Default for ReplyBuilder {
    fn default() -> Self {
        Self::new(RepliesConfig::default())
    }
}

impl ReplyBuilder {
    pub fn new(templates: RepliesConfig) -> Self {
        Self {
            templates,
            summarizer: Arc::new(EmptySummarizer),
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn greeting(&self) -> String {
        self.templates.greeting.clone()
    }

    pub fn describe_more(&self) -> String {
        self.templates.describe_more.clone()
    }

    pub fn closing(&self) -> String {
        self.templates.closing.clone()
    }

    pub fn not_recognized(&self) -> String {
        self.templates.not_recognized.clone()
    }

    pub fn symptoms_first(&self) -> String {
        self.templates.symptoms_first.clone()
    }

    pub fn not_understood(&self) -> String {
        self.templates.not_understood.clone()
    }

    /// "Recognized symptoms: a, b" over the accumulated set
    pub fn recognized(&self, symptoms: &BTreeSet<String>) -> String {
        let joined = symptoms.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        render(&self.templates.recognized_prefix, &[("symptoms", &joined)])
    }

    /// Header plus one line per ranked disease
    pub fn ranked(&self, predictions: &[Prediction]) -> Vec<String> {
        std::iter::once(self.templates.ranked_header.clone())
            .chain(predictions.iter().map(|p| {
                render(
                    &self.templates.ranked_line,
                    &[("disease", &p.disease), ("probability", &p.percent())],
                )
            }))
            .collect()
    }

    pub fn confirm_question(&self) -> String {
        self.templates.confirm_question.clone()
    }

    /// Assessment naming `top` as the likely condition
    pub fn final_assessment(&self, state: &ConversationState, top: &Prediction) -> String {
        let summary = self.summarizer.summarize(state);
        render(
            &self.templates.final_assessment,
            &[("disease", &top.disease), ("summary", &summary)],
        )
    }

    pub fn treatment_referral(&self, state: &ConversationState, top: &Prediction) -> String {
        let summary = self.summarizer.summarize(state);
        render(
            &self.templates.treatment_referral,
            &[("disease", &top.disease), ("summary", &summary)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SymptomListSummarizer;

    impl Summarizer for SymptomListSummarizer {
        fn summarize(&self, state: &ConversationState) -> String {
            state.symptoms.iter().cloned().collect::<Vec<_>>().join(" + ")
        }
    }

    #[test]
    fn test_ranked_lines() {
        let builder = ReplyBuilder::default();
        let lines = builder.ranked(&[Prediction::new("flu", 0.5), Prediction::new("cold", 0.4)]);
        assert_eq!(lines, vec!["Possible diseases:", "flu: 50.0%", "cold: 40.0%"]);
    }

    #[test]
    fn test_recognized_is_sorted() {
        let builder = ReplyBuilder::default();
        let symptoms: BTreeSet<String> = ["fever", "cough"].iter().map(|s| s.to_string()).collect();
        assert_eq!(builder.recognized(&symptoms), "Recognized symptoms: cough, fever");
    }

    #[test]
    fn test_summary_seam() {
        let builder = ReplyBuilder::default().with_summarizer(Arc::new(SymptomListSummarizer));
        let mut state = ConversationState::default();
        state.symptoms.insert("fever".into());
        state.symptoms.insert("cough".into());

        let reply = builder.final_assessment(&state, &Prediction::new("flu", 0.9));
        assert_eq!(
            reply,
            "Final assessment: flu\nSummary: cough + fever\nPlease consult with a doctor."
        );
    }

    #[test]
    fn test_treatment_referral_names_disease() {
        let builder = ReplyBuilder::default();
        let reply =
            builder.treatment_referral(&ConversationState::default(), &Prediction::new("flu", 0.9));
        assert!(reply.contains("Based on the likely condition (flu)"));
    }
}
