use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::application::ports::FailureLog;
use crate::domain::SessionId;

const ENTRY_SEPARATOR: &str = "----------------";

/// Appends one block per failed run to a plain-text file.
pub struct FileFailureLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileFailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl FailureLog for FileFailureLog {
    async fn record(&self, session_id: &SessionId, detail: &str) -> std::io::Result<()> {
        let entry = format!(
            "\n[{}] {} ERROR:\n{}\n{}\n",
            session_id,
            chrono::Utc::now().to_rfc3339(),
            detail,
            ENTRY_SEPARATOR
        );

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}
