//! Mock implementations for testing
//!
//! These mocks let the response service and the session controller run
//! without any network I/O.

use crate::api::{ChatReply, ChatRequest};
use crate::llm::{LlmError, LlmRequest, LlmResponse, LlmService, SpeechAudio, SpeechService};
use crate::session::{ClientError, ResponseClient};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock completion provider
// ============================================================================

/// Mock completion provider that returns queued responses
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    model_id: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_response(&self, response: LlmResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock speech provider
// ============================================================================

/// Mock speech provider; fails when nothing is queued
pub struct MockSpeechService {
    clips: Mutex<VecDeque<Result<SpeechAudio, LlmError>>>,
    inputs: Mutex<Vec<String>>,
}

impl MockSpeechService {
    pub fn new() -> Self {
        Self {
            clips: Mutex::new(VecDeque::new()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_audio(&self, audio: SpeechAudio) {
        self.clips.lock().unwrap().push_back(Ok(audio));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.clips.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for MockSpeechService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechService for MockSpeechService {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, LlmError> {
        self.inputs.lock().unwrap().push(text.to_string());
        self.clips
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock audio queued")))
    }

    fn voice(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Mock response client (controller side)
// ============================================================================

/// Mock transport for the session controller
pub struct MockResponseClient {
    replies: Mutex<VecDeque<Result<ChatReply, ClientError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockResponseClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, text: &str, audio_url: Option<&str>) {
        self.replies.lock().unwrap().push_back(Ok(ChatReply {
            message: text.to_string(),
            audio_url: audio_url.map(str::to_string),
            timestamp: chrono::Utc::now(),
        }));
    }

    pub fn queue_error(&self, error: ClientError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockResponseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseClient for MockResponseClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("No mock reply queued".into())))
    }
}
