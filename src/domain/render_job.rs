#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderJobStatus {
    Pending,
    Done,
    Error,
}

impl RenderJobStatus {
    /// Maps the remote service's status vocabulary.
    pub fn from_remote(status: &str) -> Self {
        match status {
            "done" => RenderJobStatus::Done,
            "error" | "rejected" => RenderJobStatus::Error,
            _ => RenderJobStatus::Pending,
        }
    }
}

/// Snapshot of a remote render job.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub id: String,
    pub status: RenderJobStatus,
    pub result_url: Option<String>,
    pub duration: Option<f64>,
    pub error: Option<String>,
}
