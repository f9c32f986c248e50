mod audio_decoder;
mod azure_whisper_engine;
mod ffmpeg_media_adapter;
mod openai_whisper_engine;
mod transcription_engine_factory;
mod wav_encoder;

pub use audio_decoder::decode_wav;
pub use azure_whisper_engine::AzureWhisperEngine;
pub use ffmpeg_media_adapter::FfmpegMediaAdapter;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
pub use wav_encoder::encode_wav;
