use std::time::Duration;

use interview_engine::domain::{
    AvatarClip, CacheKey, CachedClip, Expression, IntentAction, IntentDecision, InterviewScore,
    InterviewScript, InterviewSession, PcmAudio, RenderJobStatus, ScoreValidationError, SessionId,
    SessionStatus, StoragePath, TranscriptSegment,
};

fn score_json() -> serde_json::Value {
    serde_json::json!({
        "q1": {"score": 4, "reasoning": "Concrete examples"},
        "q2": {"score": 2, "reasoning": "Blamed the market"},
        "q3": {"score": 5, "reasoning": "Researched the company"},
        "overall": {
            "communication_clarity": 4,
            "sales_mindset_ownership": 3,
            "resilience_learning": 2,
            "role_motivation": 5,
            "recommendation": "Maybe",
            "summary": "Mixed"
        }
    })
}

#[test]
fn given_new_session_when_created_then_starts_without_recording() {
    let session = InterviewSession::new("Ali".into(), "ali@example.com".into());

    assert_eq!(session.status, SessionStatus::Started);
    assert!(session.recording.is_none());
    assert!(session.score.is_none());
}

#[test]
fn given_started_session_when_attaching_recording_then_becomes_uploaded() {
    let mut session = InterviewSession::new("Ali".into(), "ali@example.com".into());
    let path = StoragePath::recording(&session.id);

    session.attach_recording(path.clone()).unwrap();

    assert_eq!(session.status, SessionStatus::Uploaded);
    assert_eq!(session.recording, Some(path));
}

#[test]
fn given_processing_session_when_uploading_again_then_transition_is_rejected() {
    let mut session = InterviewSession::new("Ali".into(), "ali@example.com".into());
    session
        .attach_recording(StoragePath::recording(&session.id))
        .unwrap();
    session.transition_to(SessionStatus::Processing).unwrap();

    let err = session
        .attach_recording(StoragePath::recording(&session.id))
        .unwrap_err();

    assert_eq!(err.from, SessionStatus::Processing);
    assert_eq!(err.to, SessionStatus::Uploaded);
    assert_eq!(session.status, SessionStatus::Processing);
}

#[test]
fn given_status_graph_when_checking_transitions_then_only_forward_moves_and_retries_allowed() {
    use SessionStatus::*;

    assert!(Started.can_transition_to(Uploaded));
    assert!(Uploaded.can_transition_to(Processing));
    assert!(Processing.can_transition_to(Completed));
    assert!(Processing.can_transition_to(Failed));
    assert!(Failed.can_transition_to(Processing));
    assert!(Completed.can_transition_to(Processing));

    assert!(!Started.can_transition_to(Processing));
    assert!(!Started.can_transition_to(Completed));
    assert!(!Uploaded.can_transition_to(Completed));
    assert!(!Completed.can_transition_to(Failed));
    assert!(!Failed.can_transition_to(Started));
}

#[test]
fn given_status_names_when_parsing_then_round_trip_through_display() {
    for status in [
        SessionStatus::Started,
        SessionStatus::Uploaded,
        SessionStatus::Processing,
        SessionStatus::Completed,
        SessionStatus::Failed,
    ] {
        assert_eq!(status.to_string().parse::<SessionStatus>().unwrap(), status);
    }
    assert!("archived".parse::<SessionStatus>().is_err());
}

#[test]
fn given_processing_session_when_completing_then_results_are_recorded() {
    let mut session = InterviewSession::new("Ali".into(), "ali@example.com".into());
    session
        .attach_recording(StoragePath::recording(&session.id))
        .unwrap();
    session.transition_to(SessionStatus::Processing).unwrap();

    session
        .complete(
            "hello".to_string(),
            vec![TranscriptSegment::new("hello", 0.0, 3.0)],
            None,
        )
        .unwrap();

    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.status.is_terminal());
    assert_eq!(session.transcript.as_deref(), Some("hello"));
}

#[test]
fn given_session_id_when_building_recording_path_then_uses_fixed_filename() {
    let path = StoragePath::recording(&SessionId::from_raw("abc-123"));

    assert_eq!(path.as_str(), "abc-123/full_interview.webm");
}

#[test]
fn given_cache_key_when_building_avatar_audio_path_then_embeds_key() {
    let keyed = StoragePath::avatar_audio(Some(&CacheKey::new("q2")));
    let unkeyed = StoragePath::avatar_audio(None);

    assert_eq!(keyed.as_str(), "avatar_audio/avatar_q2.mp3");
    assert_eq!(unkeyed.as_str(), "avatar_audio/avatar_temp.mp3");
}

#[test]
fn given_rubric_json_when_deserializing_then_questions_and_overall_are_split() {
    let score: InterviewScore = serde_json::from_value(score_json()).unwrap();

    assert_eq!(score.questions.len(), 3);
    assert_eq!(score.questions["q2"].score, 2);
    assert_eq!(score.overall.role_motivation, 5);
    assert!(score.validate(3).is_ok());
    assert_eq!(serde_json::to_value(&score).unwrap(), score_json());
}

#[test]
fn given_missing_question_when_validating_then_reports_key() {
    let mut json = score_json();
    json.as_object_mut().unwrap().remove("q3");
    let score: InterviewScore = serde_json::from_value(json).unwrap();

    assert_eq!(
        score.validate(3),
        Err(ScoreValidationError::MissingQuestion("q3".to_string()))
    );
}

#[test]
fn given_zero_dimension_score_when_validating_then_reports_out_of_range() {
    let mut json = score_json();
    json["overall"]["resilience_learning"] = serde_json::json!(0);
    let score: InterviewScore = serde_json::from_value(json).unwrap();

    assert!(matches!(
        score.validate(3),
        Err(ScoreValidationError::OutOfRange { ref field, value: 0 }) if field == "resilience_learning"
    ));
}

#[test]
fn given_unknown_recommendation_when_deserializing_then_fails() {
    let mut json = score_json();
    json["overall"]["recommendation"] = serde_json::json!("Definitely");

    assert!(serde_json::from_value::<InterviewScore>(json).is_err());
}

#[test]
fn given_cache_document_values_when_parsing_then_distinguishes_clips_from_errors() {
    let ready: CachedClip = serde_json::from_value(serde_json::json!({
        "video_url": "https://v.test/a.mp4", "duration": 3.5, "talk_id": "tlk_a"
    }))
    .unwrap();
    let failed: CachedClip = serde_json::from_value(serde_json::json!({"error": "Timeout"})).unwrap();

    assert_eq!(
        ready.as_ready(),
        Some(&AvatarClip {
            video_url: "https://v.test/a.mp4".to_string(),
            duration: 3.5,
            talk_id: "tlk_a".to_string(),
        })
    );
    assert!(failed.as_ready().is_none());
}

#[test]
fn given_conductor_vocabulary_when_deserializing_actions_then_aliases_map() {
    let parse = |s: &str| serde_json::from_value::<IntentAction>(serde_json::json!(s)).unwrap();

    assert_eq!(parse("advance"), IntentAction::Advance);
    assert_eq!(parse("next"), IntentAction::Advance);
    assert_eq!(parse("nudge"), IntentAction::PromptAgain);
    assert_eq!(parse("prompt_again"), IntentAction::PromptAgain);
    assert_eq!(parse("rephrase"), IntentAction::Restate);
}

#[test]
fn given_decision_when_serializing_then_uses_canonical_action_names() {
    let decision = IntentDecision::prompt_again("Silence or Noise", "");

    assert_eq!(
        serde_json::to_value(&decision).unwrap(),
        serde_json::json!({"action": "prompt_again", "reason": "Silence or Noise", "transcript": ""})
    );
}

#[test]
fn given_default_script_when_listing_avatar_scripts_then_covers_every_prompt() {
    let scripts = InterviewScript::default().avatar_scripts();

    let keys: Vec<&str> = scripts.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, ["intro", "q1", "q2", "q3", "outro", "nudge", "restate"]);
    assert_eq!(scripts[0].expression, Expression::Happy);
    assert_eq!(scripts[1].expression, Expression::Neutral);
    assert_eq!(
        scripts[2].text,
        "Describe a time you missed target. What did you change afterward?"
    );
}

#[test]
fn given_script_keys_when_looking_up_text_then_numbers_and_q_keys_resolve() {
    let script = InterviewScript::default();

    assert_eq!(script.script_text("outro"), Some(script.outro.as_str()));
    assert_eq!(script.script_text("1"), Some(script.questions[0].as_str()));
    assert_eq!(script.script_text("q3"), Some(script.questions[2].as_str()));
    assert_eq!(script.script_text("0"), None);
    assert_eq!(script.script_text("q4"), None);
    assert_eq!(script.script_text("closing"), None);
}

#[test]
fn given_remote_status_words_when_mapping_then_unknown_words_stay_pending() {
    assert_eq!(RenderJobStatus::from_remote("done"), RenderJobStatus::Done);
    assert_eq!(RenderJobStatus::from_remote("error"), RenderJobStatus::Error);
    assert_eq!(RenderJobStatus::from_remote("rejected"), RenderJobStatus::Error);
    assert_eq!(RenderJobStatus::from_remote("created"), RenderJobStatus::Pending);
    assert_eq!(RenderJobStatus::from_remote("started"), RenderJobStatus::Pending);
}

#[test]
fn given_sixty_five_seconds_when_windowing_by_thirty_then_last_window_is_short() {
    let audio = PcmAudio::new(vec![0.0; 65 * 16_000], 16_000);

    let windows = audio.windows(Duration::from_secs(30));

    assert_eq!(windows.len(), 3);
    assert_eq!(windows[1].start_secs, 30.0);
    assert_eq!(windows[2].start_secs, 60.0);
    assert_eq!(windows[2].end_secs, 65.0);
    assert_eq!(windows[2].audio.samples.len(), 5 * 16_000);
}

#[test]
fn given_empty_audio_when_windowing_then_no_windows() {
    let audio = PcmAudio::new(Vec::new(), 16_000);

    assert!(audio.windows(Duration::from_secs(30)).is_empty());
    assert_eq!(audio.duration_secs(), 0.0);
}
