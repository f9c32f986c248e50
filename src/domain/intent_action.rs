use std::fmt;

use serde::{Deserialize, Serialize};

/// What the interview conductor should do after an utterance.
///
/// The aliases accept the vocabulary of the earlier conductor prompt
/// (`next`, `nudge`, `rephrase`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    #[serde(alias = "next")]
    Advance,
    #[serde(alias = "nudge")]
    PromptAgain,
    #[serde(alias = "rephrase")]
    Restate,
}

impl IntentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentAction::Advance => "advance",
            IntentAction::PromptAgain => "prompt_again",
            IntentAction::Restate => "restate",
        }
    }
}

impl fmt::Display for IntentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
