//! Evidence accumulation
//!
//! The symptom set only grows within a conversation and the transcript only
//! gets appended to. Both operations work on the turn's working copy of the
//! state, so nothing reaches the caller until the whole turn succeeds.

use std::collections::BTreeSet;

use triage_core::ConversationState;

/// Union `new_symptoms` into the state's symptom set
///
/// Returns `true` when at least one previously absent symptom was added,
/// which is what makes re-running prediction worthwhile.
pub fn merge(state: &mut ConversationState, new_symptoms: &BTreeSet<String>) -> bool {
    let before = state.symptoms.len();
    state.symptoms.extend(new_symptoms.iter().cloned());
    let added = state.symptoms.len() - before;

    if added > 0 {
        tracing::debug!(added, total = state.symptoms.len(), "Merged new symptoms");
    }
    added > 0
}

/// Append the turn's utterance to the transcript (once per turn)
pub fn record_utterance(state: &mut ConversationState, utterance: &str) {
    state.transcript.push(utterance.to_string());
}
