use serde::{Deserialize, Serialize};

/// Marker stored for a window the recognizer could not make sense of.
pub const SILENCE_MARKER: &str = "[...]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            text: text.into(),
            start_secs,
            end_secs,
        }
    }

    pub fn silence(start_secs: f64, end_secs: f64) -> Self {
        Self::new(SILENCE_MARKER, start_secs, end_secs)
    }

    pub fn is_silence(&self) -> bool {
        self.text == SILENCE_MARKER
    }
}
