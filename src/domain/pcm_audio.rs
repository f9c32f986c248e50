use std::time::Duration;

/// Sample rate every transcription engine receives.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// A fixed-length slice of a longer recording, positioned in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioWindow {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    pub audio: PcmAudio,
}

impl PcmAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Splits the audio into consecutive windows of `window` length; the last
    /// window holds whatever remains.
    pub fn windows(&self, window: Duration) -> Vec<AudioWindow> {
        let window_samples = (window.as_secs_f64() * self.sample_rate as f64) as usize;
        if window_samples == 0 {
            return Vec::new();
        }

        let rate = self.sample_rate as f64;
        self.samples
            .chunks(window_samples)
            .enumerate()
            .map(|(index, chunk)| {
                let start = index * window_samples;
                AudioWindow {
                    index,
                    start_secs: start as f64 / rate,
                    end_secs: (start + chunk.len()) as f64 / rate,
                    audio: PcmAudio::new(chunk.to_vec(), self.sample_rate),
                }
            })
            .collect()
    }
}
