use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::Deserialize;

use crate::application::ports::{
    LlmClient, LlmClientError, MediaAdapter, TranscriptionEngine, decode_completion,
};
use crate::domain::{IntentAction, IntentDecision};

use super::rubric::intent_system_prompt;

/// Replies shorter than this are treated as silence or noise.
pub const MIN_ANSWER_WORDS: usize = 2;
/// Replies shorter than this get another prompt when the model is unavailable.
pub const FALLBACK_MIN_WORDS: usize = 5;
/// Nudges allowed per question before the interview moves on regardless.
pub const MAX_PROMPTS_PER_QUESTION: u32 = 2;

static CLARIFICATION_PHRASING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(repeat|rephrase|pardon)\W*$|\b((can|could|would) you (please )?(repeat|rephrase|say (that|it) again)|please (repeat|rephrase)|repeat (that|the question|please)|rephrase (that|the question|it)|say (that|it) again|come again|i (don[’']?t|do not|didn[’']?t|did not) understand|what do you mean|(didn[’']?t|did not) (get|catch) (that|the question))\b",
    )
    .unwrap()
});

static SKIP_PHRASING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(skip|pass|next)(\W+(please|thanks|thank you))?\W*$|\b(skip (this|that|it|the question)|(next|another) question|(let[’']?s|let us|can we|could we|i[’']?d like to|i want to) (just )?(move on|skip)|i[’']?ll pass|i will pass|pass on (this|that|it))\b",
    )
    .unwrap()
});

#[derive(Debug, Deserialize)]
struct IntentVerdict {
    action: IntentAction,
    #[serde(default)]
    reason: String,
}

/// Per-turn decision engine: audio reply in, next conductor action out.
///
/// `decide` never fails. Every remote failure degrades to a heuristic
/// decision so a live interview cannot stall on an outage.
pub struct AnswerIntentRouter {
    media: Arc<dyn MediaAdapter>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    llm_client: Arc<dyn LlmClient>,
}

impl AnswerIntentRouter {
    pub fn new(
        media: Arc<dyn MediaAdapter>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        llm_client: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            media,
            transcription_engine,
            llm_client,
        }
    }

    #[tracing::instrument(skip(self, audio, question_text), fields(bytes = audio.len()))]
    pub async fn decide(&self, audio: &[u8], question_text: &str, attempt: u32) -> IntentDecision {
        let pcm = match self.media.normalize(audio).await {
            Ok(pcm) => pcm,
            Err(e) => {
                tracing::warn!(error = %e, "Reply audio conversion failed, advancing");
                return IntentDecision::advance("conversion failed", "");
            }
        };

        let transcript = match self.transcription_engine.transcribe(&pcm).await {
            Ok(transcription) => transcription.into_text(),
            Err(e) => {
                tracing::warn!(error = %e, "Reply transcription failed, advancing");
                return IntentDecision::advance("transcription failed", "");
            }
        };

        self.decide_transcript(&transcript, question_text, attempt)
            .await
    }

    /// Decision for an already transcribed reply.
    pub async fn decide_transcript(
        &self,
        transcript: &str,
        question_text: &str,
        attempt: u32,
    ) -> IntentDecision {
        let word_count = count_words(transcript);
        tracing::debug!(word_count, attempt, "Classifying reply");

        if let Some(decision) = word_count_gate(transcript, attempt) {
            return decision;
        }

        if let Some(decision) = classify_explicit_phrasing(transcript) {
            return decision;
        }

        match self.classify_with_llm(transcript, question_text, attempt).await {
            Ok(decision) => decision,
            Err(e) => {
                tracing::warn!(error = %e, "Intent model unavailable, using word-count fallback");
                fallback_decision(transcript, attempt)
            }
        }
    }

    async fn classify_with_llm(
        &self,
        transcript: &str,
        question_text: &str,
        attempt: u32,
    ) -> Result<IntentDecision, LlmClientError> {
        let system_prompt = intent_system_prompt(question_text, attempt);
        let value = self
            .llm_client
            .complete_json(&system_prompt, transcript)
            .await?;
        let verdict: IntentVerdict = decode_completion(value)?;

        tracing::info!(action = %verdict.action, "Intent classified");

        Ok(IntentDecision::new(verdict.action, verdict.reason, transcript))
    }
}

pub fn count_words(transcript: &str) -> usize {
    transcript.split_whitespace().count()
}

/// Literal rubric rules for replies that passed the word-count gate: a
/// request for clarification restates, an explicit closing skip advances.
/// Clarification wins when both appear. A skip word inside an answer
/// ("next year", "I passed") is left to the model.
pub fn classify_explicit_phrasing(transcript: &str) -> Option<IntentDecision> {
    if CLARIFICATION_PHRASING.is_match(transcript) {
        return Some(IntentDecision::restate("Clarification requested", transcript));
    }
    if SKIP_PHRASING.is_match(transcript) {
        return Some(IntentDecision::advance("Candidate skipped", transcript));
    }
    None
}

/// Silence or noise: nudge until the per-question ceiling, then move on.
pub fn word_count_gate(transcript: &str, attempt: u32) -> Option<IntentDecision> {
    if count_words(transcript) >= MIN_ANSWER_WORDS {
        return None;
    }
    if attempt < MAX_PROMPTS_PER_QUESTION {
        Some(IntentDecision::prompt_again("Silence or Noise", transcript))
    } else {
        Some(IntentDecision::advance("max attempts reached", transcript))
    }
}

/// Decision used when the intent model cannot be reached or answers garbage.
pub fn fallback_decision(transcript: &str, attempt: u32) -> IntentDecision {
    if count_words(transcript) < FALLBACK_MIN_WORDS && attempt < MAX_PROMPTS_PER_QUESTION {
        IntentDecision::prompt_again("Too Short (Fallback)", transcript)
    } else {
        IntentDecision::advance("Fallback Default", transcript)
    }
}
