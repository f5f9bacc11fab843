//! Summary seam for assessment replies

use crate::ConversationState;

/// Produces the free-text summary placed into assessment replies
///
/// Implementations may use the transcript and accumulated symptoms; they
/// must not modify the state.
pub trait Summarizer: Send + Sync + 'static {
    fn summarize(&self, state: &ConversationState) -> String;
}

/// Summarizer that always returns an empty summary
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySummarizer;

impl Summarizer for EmptySummarizer {
    fn summarize(&self, _state: &ConversationState) -> String {
        String::new()
    }
}
