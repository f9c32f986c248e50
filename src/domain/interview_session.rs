use chrono::{DateTime, Utc};

use super::{InterviewScore, SessionId, SessionStatus, StoragePath, TranscriptSegment};

#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSession {
    pub id: SessionId,
    pub candidate_name: String,
    pub candidate_email: String,
    pub status: SessionStatus,
    pub recording: Option<StoragePath>,
    pub transcript: Option<String>,
    pub score: Option<InterviewScore>,
    pub segments: Option<Vec<TranscriptSegment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid session transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: SessionStatus,
    pub to: SessionStatus,
}

impl InterviewSession {
    pub fn new(candidate_name: String, candidate_email: String) -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            candidate_name,
            candidate_email,
            status: SessionStatus::Started,
            recording: None,
            transcript: None,
            score: None,
            segments: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn transition_to(&mut self, next: SessionStatus) -> Result<(), InvalidTransition> {
        if !self.status.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn attach_recording(&mut self, path: StoragePath) -> Result<(), InvalidTransition> {
        self.transition_to(SessionStatus::Uploaded)?;
        self.recording = Some(path);
        Ok(())
    }

    /// Records the outcome of a successful processing run.
    pub fn complete(
        &mut self,
        transcript: String,
        segments: Vec<TranscriptSegment>,
        score: Option<InterviewScore>,
    ) -> Result<(), InvalidTransition> {
        self.transition_to(SessionStatus::Completed)?;
        self.transcript = Some(transcript);
        self.segments = Some(segments);
        self.score = score;
        Ok(())
    }
}
