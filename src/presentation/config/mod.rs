mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VARIABLE, Environment};
pub use settings::{
    AvatarSettings, DatabaseProviderSetting, DatabaseSettings, LlmSettings, LoggingSettings,
    OpenAiFlavor, ProcessingSettings, ServerSettings, Settings, SpeechSettings,
    StorageProviderSetting, StorageSettings, TranscriptionSettings,
};
