use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::domain::SessionId;

use super::session_processor::SessionProcessor;

/// Work performed for each dequeued session.
#[async_trait]
pub trait SessionJobHandler: Send + Sync {
    async fn handle(&self, session_id: &SessionId);
}

#[async_trait]
impl SessionJobHandler for SessionProcessor {
    async fn handle(&self, session_id: &SessionId) {
        if let Err(e) = self.process(session_id).await {
            tracing::error!(error = %e, "Processing job failed");
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Queued,
    /// The session is already queued or being processed; nothing was added.
    AlreadyInFlight,
}

#[derive(Debug, thiserror::Error)]
pub enum EnqueueError {
    #[error("processing queue is full")]
    QueueFull,
    #[error("processing workers have stopped")]
    Closed,
}

type InFlight = Arc<Mutex<HashSet<SessionId>>>;

/// Bounded hand-off between request handlers and the processing workers.
///
/// A session id is held in the in-flight set from enqueue until its worker
/// finishes, so at most one run per session is active in this process.
#[derive(Clone)]
pub struct ProcessingQueue {
    sender: mpsc::Sender<SessionId>,
    in_flight: InFlight,
}

impl ProcessingQueue {
    pub fn start(
        handler: Arc<dyn SessionJobHandler>,
        workers: usize,
        capacity: usize,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let in_flight: InFlight = Arc::new(Mutex::new(HashSet::new()));

        let handles = (0..workers.max(1))
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&receiver),
                    Arc::clone(&handler),
                    Arc::clone(&in_flight),
                ))
            })
            .collect();

        (Self { sender, in_flight }, handles)
    }

    pub fn enqueue(&self, session_id: SessionId) -> Result<EnqueueOutcome, EnqueueError> {
        if !lock(&self.in_flight).insert(session_id.clone()) {
            tracing::debug!(session_id = %session_id, "Session already in flight");
            return Ok(EnqueueOutcome::AlreadyInFlight);
        }

        match self.sender.try_send(session_id) {
            Ok(()) => Ok(EnqueueOutcome::Queued),
            Err(TrySendError::Full(id)) => {
                lock(&self.in_flight).remove(&id);
                Err(EnqueueError::QueueFull)
            }
            Err(TrySendError::Closed(id)) => {
                lock(&self.in_flight).remove(&id);
                Err(EnqueueError::Closed)
            }
        }
    }

    pub fn is_in_flight(&self, session_id: &SessionId) -> bool {
        lock(&self.in_flight).contains(session_id)
    }
}

fn lock(in_flight: &Mutex<HashSet<SessionId>>) -> std::sync::MutexGuard<'_, HashSet<SessionId>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the in-flight slot even if the handler panics.
struct InFlightGuard {
    in_flight: InFlight,
    session_id: SessionId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.session_id);
    }
}

async fn run_worker(
    worker: usize,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<SessionId>>>,
    handler: Arc<dyn SessionJobHandler>,
    in_flight: InFlight,
) {
    tracing::info!(worker, "Processing worker started");
    loop {
        let next = receiver.lock().await.recv().await;
        let Some(session_id) = next else { break };

        let _guard = InFlightGuard {
            in_flight: Arc::clone(&in_flight),
            session_id: session_id.clone(),
        };
        let span = tracing::info_span!("processing_job", worker, session_id = %session_id);
        handler.handle(&session_id).instrument(span).await;
    }
    tracing::info!(worker, "Processing worker stopped: channel closed");
}
