use serde::Serialize;

use super::IntentAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentDecision {
    pub action: IntentAction,
    pub reason: String,
    pub transcript: String,
}

impl IntentDecision {
    pub fn new(action: IntentAction, reason: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
            transcript: transcript.into(),
        }
    }

    pub fn advance(reason: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self::new(IntentAction::Advance, reason, transcript)
    }

    pub fn prompt_again(reason: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self::new(IntentAction::PromptAgain, reason, transcript)
    }

    pub fn restate(reason: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self::new(IntentAction::Restate, reason, transcript)
    }
}
