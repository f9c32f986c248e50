mod helpers;

use std::sync::Arc;

use interview_engine::application::ports::{
    LlmClient, LlmClientError, Transcription, TranscriptionError,
};
use interview_engine::application::services::{
    AnswerIntentRouter, classify_explicit_phrasing, count_words, fallback_decision,
    word_count_gate,
};
use interview_engine::domain::IntentAction;

use helpers::{FakeLlm, FakeMedia, ScriptedTranscriber, seconds_of_audio};

const QUESTION: &str = "Describe a time you missed target. What did you change afterward?";

fn router(transcriber: ScriptedTranscriber, llm: FakeLlm) -> (AnswerIntentRouter, Arc<FakeLlm>) {
    let llm = Arc::new(llm);
    let router = AnswerIntentRouter::new(
        Arc::new(FakeMedia::new(seconds_of_audio(3))),
        Arc::new(transcriber),
        Arc::clone(&llm) as Arc<dyn LlmClient>,
    );
    (router, llm)
}

#[test]
fn given_silence_and_first_attempt_when_gating_then_prompts_again() {
    let decision = word_count_gate("", 0).unwrap();

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Silence or Noise");
}

#[test]
fn given_single_word_and_attempt_limit_reached_when_gating_then_advances() {
    let decision = word_count_gate("umm", 2).unwrap();

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "max attempts reached");
}

#[test]
fn given_two_words_when_gating_then_gate_does_not_decide() {
    assert!(word_count_gate("well yes", 0).is_none());
}

#[test]
fn given_whitespace_heavy_reply_when_counting_words_then_ignores_blank_runs() {
    assert_eq!(count_words("  I   sold\tsoap \n"), 3);
    assert_eq!(count_words(""), 0);
}

#[test]
fn given_explicit_skip_phrasing_when_classifying_then_advances() {
    for transcript in [
        "skip",
        "Next.",
        "pass, thanks",
        "honestly I would rather skip this one and come back to it later if there is time",
        "Can we move on please",
        "next question",
        "I'll pass on this",
    ] {
        let decision = classify_explicit_phrasing(transcript).unwrap();
        assert_eq!(decision.action, IntentAction::Advance, "{transcript}");
    }
}

#[test]
fn given_skip_word_inside_an_answer_when_classifying_then_no_explicit_rule_applies() {
    for transcript in [
        "umm next year maybe",
        "I passed the certification and then moved on to enterprise accounts",
        "we would pass the lead to the next rep",
    ] {
        assert!(classify_explicit_phrasing(transcript).is_none(), "{transcript}");
    }
}

#[test]
fn given_clarification_request_when_classifying_then_restates() {
    for transcript in [
        "Can you repeat the question?",
        "Sorry, I don't understand",
        "What do you mean by missed target",
        "could you say that again",
    ] {
        let decision = classify_explicit_phrasing(transcript).unwrap();
        assert_eq!(decision.action, IntentAction::Restate, "{transcript}");
    }
}

#[test]
fn given_clarification_and_skip_together_when_classifying_then_clarification_wins() {
    let decision = classify_explicit_phrasing("I don't understand, maybe skip it").unwrap();

    assert_eq!(decision.action, IntentAction::Restate);
}

#[test]
fn given_ordinary_answer_when_classifying_then_no_explicit_rule_applies() {
    assert!(classify_explicit_phrasing("I sold B2B software for five years").is_none());
    assert!(classify_explicit_phrasing("We had repeat customers across the region").is_none());
}

#[test]
fn given_short_reply_and_retries_left_when_falling_back_then_prompts_again() {
    let decision = fallback_decision("I sold things", 1);

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Too Short (Fallback)");
}

#[test]
fn given_long_reply_when_falling_back_then_advances_with_default_reason() {
    let decision = fallback_decision("I sold B2B software for five years", 2);

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "Fallback Default");
}

#[tokio::test]
async fn given_silent_reply_on_first_attempt_when_deciding_then_prompts_again_without_model() {
    let (router, llm) = router(
        ScriptedTranscriber::scripted(vec![Ok(Transcription::Unintelligible)]),
        FakeLlm::unavailable(),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.transcript, "");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_unreachable_model_and_long_answer_when_deciding_then_falls_back_to_advance() {
    let (router, llm) = router(
        ScriptedTranscriber::always("I sold B2B software for five years"),
        FakeLlm::unavailable(),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 2).await;

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "Fallback Default");
    assert_eq!(decision.transcript, "I sold B2B software for five years");
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn given_model_verdict_when_deciding_then_returns_model_action_and_reason() {
    let (router, llm) = router(
        ScriptedTranscriber::always("I changed my route planning and call cadence"),
        FakeLlm::json(serde_json::json!({"action": "prompt_again", "reason": "Vague answer"})),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Vague answer");
    let prompts = llm.system_prompts.lock().unwrap();
    assert!(prompts[0].contains(QUESTION));
}

#[tokio::test]
async fn given_legacy_vocabulary_from_model_when_deciding_then_maps_to_actions() {
    let (router, _llm) = router(
        ScriptedTranscriber::always("that is all I have to say about it"),
        FakeLlm::json(serde_json::json!({"action": "next", "reason": "Complete"})),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::Advance);
}

#[tokio::test]
async fn given_unknown_action_from_model_when_deciding_then_uses_fallback() {
    let (router, _llm) = router(
        ScriptedTranscriber::always("we lost an account"),
        FakeLlm::json(serde_json::json!({"action": "celebrate"})),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Too Short (Fallback)");
}

#[tokio::test]
async fn given_rate_limited_model_when_deciding_then_uses_fallback() {
    let (router, _llm) = router(
        ScriptedTranscriber::always("we lost an account"),
        FakeLlm::replying(vec![Err(LlmClientError::RateLimited)]),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 2).await;

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "Fallback Default");
}

#[tokio::test]
async fn given_undecodable_audio_when_deciding_then_advances_with_conversion_failed() {
    let router = AnswerIntentRouter::new(
        Arc::new(FakeMedia::failing_normalize()),
        Arc::new(ScriptedTranscriber::always("unused")),
        Arc::new(FakeLlm::unavailable()),
    );

    let decision = router.decide(b"not-audio", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "conversion failed");
}

#[tokio::test]
async fn given_transcription_outage_when_deciding_then_advances_with_transcription_failed() {
    let (router, llm) = router(
        ScriptedTranscriber::scripted(vec![Err(TranscriptionError::ApiRequestFailed(
            "status 503".into(),
        ))]),
        FakeLlm::unavailable(),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "transcription failed");
    assert_eq!(llm.call_count(), 0);
}

#[test]
fn given_question_set_when_building_scoring_prompt_then_lists_every_question_key() {
    let questions = interview_engine::domain::InterviewScript::default().questions;

    let prompt = interview_engine::application::services::scoring_system_prompt(&questions);

    assert!(prompt.contains("1. Walk me through your sales experience"));
    assert!(prompt.contains(r#""q3": { "score": 1-5"#));
    assert!(!prompt.contains(r#""q4""#));
    assert!(prompt.contains("\"Strong Yes\" | \"Yes\" | \"Maybe\" | \"No\""));
}

#[test]
fn given_attempt_count_when_building_intent_prompt_then_embeds_question_and_attempt() {
    let prompt = interview_engine::application::services::intent_system_prompt(QUESTION, 1);

    assert!(prompt.contains(QUESTION));
    assert!(prompt.contains("Prompts already given for this question: 1"));
}

#[tokio::test]
async fn given_bare_skip_on_first_attempt_when_deciding_then_word_gate_prompts_again() {
    let (router, llm) = router(ScriptedTranscriber::always("skip"), FakeLlm::unavailable());

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Silence or Noise");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn given_vague_reply_mentioning_next_when_model_unavailable_then_falls_back_to_prompt_again() {
    let (router, llm) = router(
        ScriptedTranscriber::always("umm next year maybe"),
        FakeLlm::unavailable(),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::PromptAgain);
    assert_eq!(decision.reason, "Too Short (Fallback)");
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn given_explicit_skip_request_when_deciding_then_advances_without_model() {
    let (router, llm) = router(
        ScriptedTranscriber::always("can we skip this question please"),
        FakeLlm::unavailable(),
    );

    let decision = router.decide(b"webm-bytes", QUESTION, 0).await;

    assert_eq!(decision.action, IntentAction::Advance);
    assert_eq!(decision.reason, "Candidate skipped");
    assert_eq!(llm.call_count(), 0);
}
