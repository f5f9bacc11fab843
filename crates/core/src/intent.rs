//! Intent labels understood by the dialog

use std::fmt;

/// Intent vocabulary the dialog dispatches on
///
/// Classifiers return plain string labels; anything outside the known
/// vocabulary is kept verbatim in `Other` so it can be echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentLabel {
    Greeting,
    DescribeSymptom,
    AskTreatment,
    Unknown,
    Other(String),
}

impl IntentLabel {
    pub const GREETING: &'static str = "greeting";
    pub const DESCRIBE_SYMPTOM: &'static str = "describe_symptom";
    pub const ASK_TREATMENT: &'static str = "ask_treatment";
    pub const UNKNOWN: &'static str = "unknown";

    /// Labels every classifier vocabulary must contain
    pub const REQUIRED: [&'static str; 3] =
        [Self::GREETING, Self::DESCRIBE_SYMPTOM, Self::ASK_TREATMENT];

    /// Parse a classifier label (case-insensitive)
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.as_str() {
            Self::GREETING => Self::Greeting,
            Self::DESCRIBE_SYMPTOM => Self::DescribeSymptom,
            Self::ASK_TREATMENT => Self::AskTreatment,
            "" | Self::UNKNOWN => Self::Unknown,
            _ => Self::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Greeting => Self::GREETING,
            Self::DescribeSymptom => Self::DESCRIBE_SYMPTOM,
            Self::AskTreatment => Self::ASK_TREATMENT,
            Self::Unknown => Self::UNKNOWN,
            Self::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for IntentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
