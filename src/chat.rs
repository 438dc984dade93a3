//! Response service: produces the simulated patient's next utterance
//!
//! One call is one independent turn. The prompt is the persona for the
//! requested case, the client-supplied history, then the new message. The
//! completion call is made once with no retry; speech synthesis runs after it
//! and can only ever add audio, never fail the turn.

use crate::api::{ChatReply, ChatRequest, HistoryTurn, Sender};
use crate::llm::{
    LlmConfig, LlmError, LlmMessage, LlmRequest, LlmService, SpeechService, API_KEY_VAR,
};
use crate::persona::persona_prompt_for_tag;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Upper bound on reply length, in tokens
pub const MAX_REPLY_TOKENS: u32 = 150;
pub const TEMPERATURE: f32 = 0.7;

const SPEECH_TIMEOUT: Duration = Duration::from_secs(20);

/// Errors a chat turn can end with
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is required")]
    EmptyMessage,
    #[error("OpenAI API key is not configured")]
    NotConfigured,
    #[error("Failed to process request")]
    Upstream(#[source] LlmError),
}

impl ChatError {
    /// Extra, human-readable context for the caller
    pub fn details(&self) -> Option<String> {
        match self {
            ChatError::EmptyMessage => None,
            ChatError::NotConfigured => Some(format!(
                "Please set the {API_KEY_VAR} environment variable and restart the server."
            )),
            ChatError::Upstream(e) => Some(e.message.clone()),
        }
    }
}

/// Stateless turn handler over the configured providers
pub struct ChatService {
    llm: Option<Arc<dyn LlmService>>,
    speech: Option<Arc<dyn SpeechService>>,
}

impl ChatService {
    pub fn new(llm: Option<Arc<dyn LlmService>>, speech: Option<Arc<dyn SpeechService>>) -> Self {
        Self { llm, speech }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(config.completion_service(), config.speech_service())
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_some()
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech.is_some()
    }

    /// Run one conversation turn.
    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let message = request.trimmed_message().ok_or(ChatError::EmptyMessage)?;

        let Some(llm) = self.llm.as_ref() else {
            tracing::error!("{API_KEY_VAR} is missing, refusing chat request");
            return Err(ChatError::NotConfigured);
        };

        tracing::info!(
            case_type = request.case_type.as_deref().unwrap_or("default"),
            history_len = request.history().len(),
            "Generating patient reply"
        );

        let prompt = build_prompt(request.case_type.as_deref(), request.history(), message);
        let response = llm.complete(&prompt).await.map_err(ChatError::Upstream)?;

        let text = response.text.trim().to_string();
        if text.is_empty() {
            return Err(ChatError::Upstream(LlmError::empty_response(
                "No response from AI",
            )));
        }

        let audio_url = match &self.speech {
            Some(speech) => synthesize_best_effort(speech.as_ref(), &text).await,
            None => None,
        };

        Ok(ChatReply {
            message: text,
            audio_url,
            timestamp: Utc::now(),
        })
    }
}

/// Assemble `[persona, ...history, new user turn]`.
pub fn build_prompt(case_tag: Option<&str>, history: &[HistoryTurn], message: &str) -> LlmRequest {
    let mut messages: Vec<LlmMessage> = history
        .iter()
        .map(|turn| match turn.sender {
            Sender::User => LlmMessage::user(turn.text.clone()),
            Sender::Assistant => LlmMessage::assistant(turn.text.clone()),
        })
        .collect();
    messages.push(LlmMessage::user(message));

    LlmRequest {
        system: persona_prompt_for_tag(case_tag),
        messages,
        max_tokens: Some(MAX_REPLY_TOKENS),
        temperature: Some(TEMPERATURE),
    }
}

/// Synthesize audio for a reply, or `None` if the provider fails or stalls.
async fn synthesize_best_effort(speech: &dyn SpeechService, text: &str) -> Option<String> {
    match timeout(SPEECH_TIMEOUT, speech.synthesize(text)).await {
        Ok(Ok(audio)) => {
            let uri = audio.to_data_uri();
            tracing::debug!(
                voice = speech.voice(),
                bytes = audio.data.len(),
                "Speech synthesized"
            );
            Some(uri)
        }
        Ok(Err(e)) => {
            tracing::warn!(
                error = %e.message,
                kind = e.kind.as_str(),
                "Speech synthesis failed, continuing without audio"
            );
            None
        }
        Err(_) => {
            tracing::warn!("Speech synthesis timed out, continuing without audio");
            None
        }
    }
}
