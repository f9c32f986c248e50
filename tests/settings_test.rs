use std::time::Duration;

use interview_engine::presentation::config::{
    DatabaseProviderSetting, OpenAiFlavor, StorageProviderSetting,
};
use interview_engine::presentation::{Environment, Settings};

fn from_toml(toml: &str) -> Settings {
    config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[test]
fn given_no_overrides_when_using_defaults_then_local_stack_is_selected() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(settings.database.provider, DatabaseProviderSetting::Memory);
    assert_eq!(settings.transcription.provider, OpenAiFlavor::OpenAi);
    assert_eq!(settings.llm.model, "gpt-4o");
    assert_eq!(settings.interview.questions.len(), 3);
    assert_eq!(settings.processing.workers, 2);
}

#[test]
fn given_default_processing_settings_when_building_policy_then_thresholds_match() {
    let policy = Settings::default().processing.policy();

    assert_eq!(policy.min_recording_bytes, 1000);
    assert_eq!(policy.min_audio_bytes, 1000);
    assert_eq!(policy.transcription_window, Duration::from_secs(30));
    assert_eq!(policy.min_transcript_chars, 5);
}

#[test]
fn given_default_avatar_settings_when_building_policy_then_polls_every_two_seconds() {
    let policy = Settings::default().avatar.render_policy();

    assert_eq!(policy.poll_interval, Duration::from_secs(2));
    assert_eq!(policy.max_wait, Duration::from_secs(120));
    assert_eq!(policy.audio_url_ttl, Duration::from_secs(3600));
}

#[test]
fn given_default_database_settings_when_computing_backoff_then_delays_double() {
    let delays = Settings::default().database.connect_backoff();

    assert_eq!(
        delays,
        [500, 1000, 2000, 4000, 8000].map(Duration::from_millis)
    );
}

#[test]
fn given_long_retry_budget_when_computing_backoff_then_delays_are_capped() {
    let mut settings = Settings::default().database;
    settings.connect_retries = 10;
    settings.connect_backoff_ms = 4000;

    let delays = settings.connect_backoff();

    assert_eq!(delays.len(), 10);
    assert_eq!(delays[2], Duration::from_secs(16));
    assert_eq!(delays[9], Duration::from_secs(30));
}

#[test]
fn given_partial_file_when_loading_then_missing_keys_keep_defaults() {
    let settings = from_toml(
        r#"
        [server]
        port = 8080

        [transcription]
        provider = "azure"
        base_url = "https://speech.openai.azure.com"
        azure_deployment = "whisper"

        [database]
        provider = "postgres"
        url = "postgres://localhost/interviews"

        [processing]
        window_secs = 20
        "#,
    );

    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.server.max_upload_mb, 512);
    assert_eq!(settings.transcription.provider, OpenAiFlavor::Azure);
    assert_eq!(settings.transcription.azure_api_version, "2024-06-01");
    assert_eq!(settings.database.provider, DatabaseProviderSetting::Postgres);
    assert!(settings.database.run_migrations);
    assert_eq!(settings.database.connect_retries, 5);
    assert_eq!(
        settings.processing.policy().transcription_window,
        Duration::from_secs(20)
    );
}

#[test]
fn given_custom_script_when_loading_then_avatar_scripts_follow_questions() {
    let settings = from_toml(
        r#"
        [interview]
        questions = ["Tell me about yourself.", "Why sales?"]
        "#,
    );

    let keys: Vec<String> = settings
        .interview
        .avatar_scripts()
        .iter()
        .map(|s| s.key.to_string())
        .collect();
    assert_eq!(keys, ["intro", "q1", "q2", "outro", "nudge", "restate"]);
    assert!(settings.interview.intro.starts_with("Hi, my name is Salman"));
}

#[test]
fn given_environment_names_when_parsing_then_aliases_are_accepted() {
    assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
    assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Prod);
    assert_eq!(" test ".parse::<Environment>().unwrap(), Environment::Test);
    assert!("staging".parse::<Environment>().is_err());
}

#[test]
fn given_environment_when_resolving_file_then_uses_appsettings_name() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
}

#[test]
fn given_logging_settings_when_building_tracing_config_then_values_carry_over() {
    let settings = from_toml(
        r#"
        [logging]
        filter = "warn"
        json = true
        "#,
    );

    let config = settings.tracing_config(Environment::Test);

    assert_eq!(config.environment, "test");
    assert!(config.json_format);
    assert_eq!(config.default_filter, "warn");
}
