use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{MediaAdapter, MediaError};
use crate::domain::{PcmAudio, TARGET_SAMPLE_RATE};

use super::audio_decoder::decode_wav;

const STDERR_TAIL_CHARS: usize = 2000;

/// Media adapter backed by the `ffmpeg` binary.
pub struct FfmpegMediaAdapter {
    binary: PathBuf,
}

impl FfmpegMediaAdapter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Fails when the binary cannot be started.
    pub async fn check_available(&self) -> Result<(), MediaError> {
        let status = Command::new(&self.binary)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(MediaError::CodecUnavailable(format!(
                "{} -version exited with {}",
                self.binary.display(),
                status
            )))
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> MediaError {
        if e.kind() == ErrorKind::NotFound {
            MediaError::CodecUnavailable(format!("{} not found", self.binary.display()))
        } else {
            MediaError::Io(e)
        }
    }

    async fn transcode(&self, source: &Path, target: &Path) -> Result<(), MediaError> {
        let sample_rate = TARGET_SAMPLE_RATE.to_string();
        let output = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(source)
            .args(["-vn", "-acodec", "pcm_s16le", "-ar", &sample_rate, "-ac", "1"])
            .arg(target)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let skip = stderr.chars().count().saturating_sub(STDERR_TAIL_CHARS);
        Err(MediaError::CodecExited {
            code: output.status.code(),
            stderr: stderr.chars().skip(skip).collect(),
        })
    }
}

#[async_trait]
impl MediaAdapter for FfmpegMediaAdapter {
    async fn extract_audio(&self, source: &Path, target: &Path) -> Result<(), MediaError> {
        tracing::debug!(source = %source.display(), "Extracting audio track");
        self.transcode(source, target).await
    }

    async fn load_pcm(&self, path: &Path) -> Result<PcmAudio, MediaError> {
        let data = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || decode_wav(data))
            .await
            .map_err(|e| MediaError::DecodingFailed(format!("decoder task: {}", e)))?
    }

    async fn normalize(&self, data: &[u8]) -> Result<PcmAudio, MediaError> {
        let scratch = tempfile::Builder::new().prefix("reply-").tempdir()?;
        let source = scratch.path().join("reply.webm");
        let target = scratch.path().join("reply.wav");

        tokio::fs::write(&source, data).await?;
        self.transcode(&source, &target).await?;
        self.load_pcm(&target).await
    }
}
