//! Reply templates
//!
//! Every user-facing sentence the dialog produces comes from one of these
//! templates. Placeholders are written as `{name}` and filled by [`render`].

use serde::{Deserialize, Serialize};

/// Templated replies, each overridable from config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepliesConfig {
    pub greeting: String,
    /// Sent after the user answers "yes" to the confirmation question
    pub describe_more: String,
    pub closing: String,
    pub not_recognized: String,
    /// Placeholders: `{symptoms}`
    pub recognized_prefix: String,
    pub ranked_header: String,
    /// Placeholders: `{disease}`, `{probability}`
    pub ranked_line: String,
    pub confirm_question: String,
    /// Placeholders: `{disease}`, `{summary}`
    pub final_assessment: String,
    /// Placeholders: `{disease}`, `{summary}`
    pub treatment_referral: String,
    pub symptoms_first: String,
    pub not_understood: String,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello! Please describe your symptoms.".to_string(),
            describe_more: "Please describe your additional symptoms.".to_string(),
            closing: "Thank you for consulting DocBot. Take care!".to_string(),
            not_recognized:
                "Sorry, I didn't recognize any symptoms. Please describe them differently."
                    .to_string(),
            recognized_prefix: "Recognized symptoms: {symptoms}".to_string(),
            ranked_header: "Possible diseases:".to_string(),
            ranked_line: "{disease}: {probability}".to_string(),
            confirm_question:
                "Could you describe any other symptoms to help me be more certain? (yes/no)"
                    .to_string(),
            final_assessment:
                "Final assessment: {disease}\nSummary: {summary}\nPlease consult with a doctor."
                    .to_string(),
            treatment_referral: "{summary}\nBased on the likely condition ({disease}), \
                 please consult a doctor for personalized treatment."
                .to_string(),
            symptoms_first:
                "Please describe your symptoms first so I can suggest treatment options."
                    .to_string(),
            not_understood:
                "I didn't understand that. Please describe your symptoms or ask about treatment."
                    .to_string(),
        }
    }
}

/// Substitute `{key}` placeholders in a template
///
/// Unknown placeholders are left untouched.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{}}}", key), value);
    }
    result
}
