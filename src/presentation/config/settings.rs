use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::application::services::{ProcessingPolicy, RenderPolicy};
use crate::domain::InterviewScript;
use crate::infrastructure::observability::{DEFAULT_LOG_FILTER, TracingConfig};

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub transcription: TranscriptionSettings,
    pub llm: LlmSettings,
    pub speech: SpeechSettings,
    pub avatar: AvatarSettings,
    pub processing: ProcessingSettings,
    pub interview: InterviewScript,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layers `appsettings.{env}.toml` (optional) under `APP_SECTION__KEY`
    /// environment variables.
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn tracing_config(&self, environment: Environment) -> TracingConfig {
        TracingConfig {
            environment: environment.to_string(),
            json_format: self.logging.json,
            default_filter: self.logging.filter.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_upload_mb: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
    pub azure_account: Option<String>,
    pub azure_access_key: Option<String>,
    pub azure_container: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data/blobs".to_string(),
            azure_account: None,
            azure_access_key: None,
            azure_container: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseProviderSetting {
    #[default]
    Memory,
    Postgres,
}

const MAX_CONNECT_BACKOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub provider: DatabaseProviderSetting,
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub run_migrations: bool,
    /// Extra connection attempts made at startup before giving up.
    pub connect_retries: u32,
    pub connect_backoff_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            provider: DatabaseProviderSetting::Memory,
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
            run_migrations: true,
            connect_retries: 5,
            connect_backoff_ms: 500,
        }
    }
}

impl DatabaseSettings {
    /// Sleep before each retry: doubling from `connect_backoff_ms`, capped at 30 s.
    pub fn connect_backoff(&self) -> Vec<Duration> {
        let mut delay = Duration::from_millis(self.connect_backoff_ms);
        (0..self.connect_retries)
            .map(|_| {
                let current = delay.min(MAX_CONNECT_BACKOFF);
                delay = delay.saturating_mul(2);
                current
            })
            .collect()
    }
}

/// Which hosting of the OpenAI API a remote adapter talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenAiFlavor {
    #[default]
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub provider: OpenAiFlavor,
    pub api_key: String,
    /// Public API base URL, or the Azure resource endpoint.
    pub base_url: Option<String>,
    pub model: String,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: OpenAiFlavor::OpenAi,
            api_key: String::new(),
            base_url: None,
            model: "whisper-1".to_string(),
            azure_deployment: None,
            azure_api_version: "2024-06-01".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: OpenAiFlavor,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub azure_deployment: Option<String>,
    pub azure_api_version: String,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: OpenAiFlavor::OpenAi,
            api_key: String::new(),
            base_url: None,
            model: "gpt-4o".to_string(),
            azure_deployment: None,
            azure_api_version: "2024-06-01".to_string(),
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    pub api_key: String,
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
    pub output_format: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            voice_id: "WoB1yCV3pS7cFlDlu8ZU".to_string(),
            model_id: "eleven_turbo_v2_5".to_string(),
            output_format: "mp3_44100_128".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarSettings {
    pub api_key: String,
    pub base_url: String,
    pub presenter_url: String,
    pub cache_path: PathBuf,
    pub poll_interval_secs: u64,
    pub max_wait_secs: u64,
    pub audio_url_ttl_secs: u64,
}

impl Default for AvatarSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.d-id.com".to_string(),
            presenter_url:
                "https://create-images-results.d-id.com/DefaultPresetImage/Matt_m/model.png"
                    .to_string(),
            cache_path: PathBuf::from("avatar_cache.json"),
            poll_interval_secs: 2,
            max_wait_secs: 120,
            audio_url_ttl_secs: 3600,
        }
    }
}

impl AvatarSettings {
    pub fn render_policy(&self) -> RenderPolicy {
        RenderPolicy {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_wait: Duration::from_secs(self.max_wait_secs),
            audio_url_ttl: Duration::from_secs(self.audio_url_ttl_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub workers: usize,
    pub queue_capacity: usize,
    pub min_recording_bytes: u64,
    pub min_audio_bytes: u64,
    pub window_secs: u64,
    pub min_transcript_chars: usize,
    pub scratch_dir: Option<PathBuf>,
    pub failure_log_path: PathBuf,
    pub ffmpeg_path: PathBuf,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        let policy = ProcessingPolicy::default();
        Self {
            workers: 2,
            queue_capacity: 64,
            min_recording_bytes: policy.min_recording_bytes,
            min_audio_bytes: policy.min_audio_bytes,
            window_secs: policy.transcription_window.as_secs(),
            min_transcript_chars: policy.min_transcript_chars,
            scratch_dir: policy.scratch_dir,
            failure_log_path: PathBuf::from("processing_debug.log"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

impl ProcessingSettings {
    pub fn policy(&self) -> ProcessingPolicy {
        ProcessingPolicy {
            min_recording_bytes: self.min_recording_bytes,
            min_audio_bytes: self.min_audio_bytes,
            transcription_window: Duration::from_secs(self.window_secs.max(1)),
            min_transcript_chars: self.min_transcript_chars,
            scratch_dir: self.scratch_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            json: false,
        }
    }
}
