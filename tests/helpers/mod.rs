#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::MethodRouter;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use interview_engine::application::ports::{
    AvatarCacheMap, AvatarCacheStore, BlobStore, BlobStoreError, CacheStoreError, FailureLog,
    LlmClient, LlmClientError, MediaAdapter, MediaError, RenderApiError, RenderJobApi,
    SpeechSynthesizer, SynthesisError, Transcription, TranscriptionEngine, TranscriptionError,
};
use interview_engine::domain::{
    Expression, PcmAudio, RenderJob, RenderJobStatus, SessionId, StoragePath, TARGET_SAMPLE_RATE,
};

pub fn seconds_of_audio(secs: usize) -> PcmAudio {
    PcmAudio::new(vec![0.1; secs * TARGET_SAMPLE_RATE as usize], TARGET_SAMPLE_RATE)
}

pub fn valid_score_json() -> serde_json::Value {
    serde_json::json!({
        "q1": {"score": 4, "reasoning": "Concrete FMCG examples"},
        "q2": {"score": 3, "reasoning": "Owned the miss"},
        "q3": {"score": 5, "reasoning": "Clear motivation"},
        "overall": {
            "communication_clarity": 4,
            "sales_mindset_ownership": 4,
            "resilience_learning": 3,
            "role_motivation": 5,
            "recommendation": "Strong Yes",
            "summary": "Solid candidate"
        }
    })
}

// ---- mock http servers ----

/// Serves `app` on an ephemeral port until the returned sender fires.
pub async fn serve_mock(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_contains(&self, needle: &[u8]) -> bool {
        self.body.windows(needle.len()).any(|w| w == needle)
    }

    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub struct Captures(Arc<Mutex<Vec<CapturedRequest>>>);

impl Captures {
    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> CapturedRequest {
        self.0.lock().unwrap().last().cloned().unwrap()
    }
}

#[derive(Clone)]
struct MockReply {
    status: StatusCode,
    body: Bytes,
    captures: Captures,
}

async fn record_and_reply(
    State(reply): State<MockReply>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Bytes) {
    reply.captures.0.lock().unwrap().push(CapturedRequest {
        method,
        uri,
        headers,
        body,
    });
    (reply.status, reply.body)
}

/// Route that records every request and answers with a fixed reply.
pub fn mock_reply(captures: &Captures, status: u16, body: impl Into<Bytes>) -> MethodRouter {
    let reply = MockReply {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.into(),
        captures: captures.clone(),
    };
    axum::routing::any(record_and_reply).with_state(reply)
}

// ---- media ----

#[derive(Debug, Clone, Copy)]
pub enum ExtractBehavior {
    Succeed { bytes: usize },
    /// Codec exits non-zero after writing `bytes` of output.
    ExitWithOutput { bytes: usize },
}

pub struct FakeMedia {
    pub extract: ExtractBehavior,
    pub pcm: PcmAudio,
    pub fail_normalize: bool,
    pub extracted_from: Mutex<Option<PathBuf>>,
}

impl FakeMedia {
    pub fn new(pcm: PcmAudio) -> Self {
        Self {
            extract: ExtractBehavior::Succeed { bytes: 4096 },
            pcm,
            fail_normalize: false,
            extracted_from: Mutex::new(None),
        }
    }

    pub fn with_extract(mut self, extract: ExtractBehavior) -> Self {
        self.extract = extract;
        self
    }

    pub fn failing_normalize() -> Self {
        Self {
            fail_normalize: true,
            ..Self::new(seconds_of_audio(1))
        }
    }

    pub fn scratch_dir(&self) -> Option<PathBuf> {
        self.extracted_from
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|p| p.parent().map(Path::to_path_buf))
    }
}

#[async_trait]
impl MediaAdapter for FakeMedia {
    async fn extract_audio(&self, source: &Path, target: &Path) -> Result<(), MediaError> {
        *self.extracted_from.lock().unwrap() = Some(source.to_path_buf());
        match self.extract {
            ExtractBehavior::Succeed { bytes } => {
                tokio::fs::write(target, vec![0u8; bytes]).await?;
                Ok(())
            }
            ExtractBehavior::ExitWithOutput { bytes } => {
                tokio::fs::write(target, vec![0u8; bytes]).await?;
                Err(MediaError::CodecExited {
                    code: Some(1),
                    stderr: "premature end of stream".to_string(),
                })
            }
        }
    }

    async fn load_pcm(&self, _path: &Path) -> Result<PcmAudio, MediaError> {
        Ok(self.pcm.clone())
    }

    async fn normalize(&self, _data: &[u8]) -> Result<PcmAudio, MediaError> {
        if self.fail_normalize {
            return Err(MediaError::CodecExited {
                code: Some(1),
                stderr: "invalid data found when processing input".to_string(),
            });
        }
        Ok(self.pcm.clone())
    }
}

// ---- transcription ----

/// Replays scripted outcomes, then keeps answering with `fallback`.
pub struct ScriptedTranscriber {
    script: Mutex<VecDeque<Result<Transcription, TranscriptionError>>>,
    fallback: Transcription,
    pub calls: AtomicUsize,
}

impl ScriptedTranscriber {
    pub fn always(text: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Transcription::from_text(text),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn scripted(outcomes: Vec<Result<Transcription, TranscriptionError>>) -> Self {
        Self {
            script: Mutex::new(outcomes.into()),
            fallback: Transcription::Unintelligible,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionEngine for ScriptedTranscriber {
    async fn transcribe(&self, _audio: &PcmAudio) -> Result<Transcription, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

// ---- llm ----

pub struct FakeLlm {
    responses: Mutex<VecDeque<Result<serde_json::Value, LlmClientError>>>,
    pub calls: AtomicUsize,
    pub system_prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn replying(responses: Vec<Result<serde_json::Value, LlmClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            system_prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::replying(vec![Ok(value)])
    }

    pub fn unavailable() -> Self {
        Self::replying(vec![])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete_json(
        &self,
        system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<serde_json::Value, LlmClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmClientError::ApiRequestFailed("connection refused".into())))
    }
}

// ---- blob store ----

#[derive(Default)]
pub struct MemoryBlobStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub uploads: AtomicUsize,
    pub fail_uploads: bool,
}

impl MemoryBlobStore {
    pub fn with_object(path: &StoragePath, data: Vec<u8>) -> Self {
        let store = Self::default();
        store
            .objects
            .lock()
            .unwrap()
            .insert(path.as_str().to_string(), data);
        store
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        _content_length: Option<u64>,
    ) -> Result<u64, BlobStoreError> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads {
            return Err(BlobStoreError::UploadFailed("container unavailable".into()));
        }
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }
        let len = data.len() as u64;
        self.objects
            .lock()
            .unwrap()
            .insert(path.as_str().to_string(), data);
        Ok(len)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Vec<u8>, BlobStoreError> {
        self.objects
            .lock()
            .unwrap()
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))
    }

    async fn signed_read_url(
        &self,
        path: &StoragePath,
        ttl: Duration,
    ) -> Result<String, BlobStoreError> {
        Ok(format!("https://blob.test/{}?se={}", path, ttl.as_secs()))
    }
}

// ---- failure log ----

#[derive(Default)]
pub struct RecordingFailureLog {
    pub entries: Mutex<Vec<(SessionId, String)>>,
}

impl RecordingFailureLog {
    pub fn entries(&self) -> Vec<(SessionId, String)> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl FailureLog for RecordingFailureLog {
    async fn record(&self, session_id: &SessionId, detail: &str) -> io::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .push((session_id.clone(), detail.to_string()));
        Ok(())
    }
}

// ---- avatar ----

#[derive(Default)]
pub struct FakeSynthesizer {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl FakeSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SynthesisError::ApiRequestFailed("quota exceeded".into()));
        }
        Ok(vec![0xFF, 0xFB, 0x90, 0x00])
    }
}

pub fn pending_job(id: &str) -> RenderJob {
    RenderJob {
        id: id.to_string(),
        status: RenderJobStatus::Pending,
        result_url: None,
        duration: None,
        error: None,
    }
}

pub fn done_job(id: &str) -> RenderJob {
    RenderJob {
        id: id.to_string(),
        status: RenderJobStatus::Done,
        result_url: Some(format!("https://video.test/{}.mp4", id)),
        duration: Some(6.5),
        error: None,
    }
}

/// Each created job reports `pending_polls` pending statuses before the
/// scripted terminal status (or pending forever when `terminal` is None).
pub struct FakeRenderApi {
    pub create_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub pending_polls: usize,
    pub terminal: Option<RenderJobStatus>,
    pub reject_with: Option<String>,
    pub transient_poll_failures: usize,
    pub expressions: Mutex<Vec<Expression>>,
}

impl FakeRenderApi {
    pub fn completing_after(pending_polls: usize) -> Self {
        Self {
            create_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            pending_polls,
            terminal: Some(RenderJobStatus::Done),
            reject_with: None,
            transient_poll_failures: 0,
            expressions: Mutex::new(Vec::new()),
        }
    }

    pub fn never_finishing() -> Self {
        Self {
            terminal: None,
            ..Self::completing_after(0)
        }
    }

    pub fn failing_render() -> Self {
        Self {
            terminal: Some(RenderJobStatus::Error),
            ..Self::completing_after(1)
        }
    }

    pub fn rejecting(body: &str) -> Self {
        Self {
            reject_with: Some(body.to_string()),
            ..Self::completing_after(0)
        }
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RenderJobApi for FakeRenderApi {
    async fn create_job(
        &self,
        _audio_url: &str,
        expression: Expression,
    ) -> Result<String, RenderApiError> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.expressions.lock().unwrap().push(expression);
        if let Some(body) = &self.reject_with {
            return Err(RenderApiError::Rejected(body.clone()));
        }
        self.status_calls.store(0, Ordering::SeqCst);
        Ok(format!("tlk_{}", n + 1))
    }

    async fn job_status(&self, job_id: &str) -> Result<RenderJob, RenderApiError> {
        let poll = self.status_calls.fetch_add(1, Ordering::SeqCst);
        if poll < self.transient_poll_failures {
            return Err(RenderApiError::ApiRequestFailed("connection reset".into()));
        }
        if poll < self.transient_poll_failures + self.pending_polls {
            return Ok(pending_job(job_id));
        }
        match self.terminal {
            Some(RenderJobStatus::Done) => Ok(done_job(job_id)),
            Some(RenderJobStatus::Error) => Ok(RenderJob {
                error: Some("face not detected".to_string()),
                status: RenderJobStatus::Error,
                ..pending_job(job_id)
            }),
            _ => Ok(pending_job(job_id)),
        }
    }
}

#[derive(Default)]
pub struct MemoryCacheStore {
    pub initial: AvatarCacheMap,
    pub saved: Mutex<Option<AvatarCacheMap>>,
    pub saves: AtomicUsize,
    pub cleared: AtomicUsize,
    pub fail_saves: bool,
}

impl MemoryCacheStore {
    pub fn with_entries(initial: AvatarCacheMap) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvatarCacheStore for MemoryCacheStore {
    async fn load(&self) -> Result<AvatarCacheMap, CacheStoreError> {
        Ok(self.initial.clone())
    }

    async fn save(&self, entries: &AvatarCacheMap) -> Result<(), CacheStoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(CacheStoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )));
        }
        *self.saved.lock().unwrap() = Some(entries.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheStoreError> {
        self.cleared.fetch_add(1, Ordering::SeqCst);
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}
