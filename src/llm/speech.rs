//! Text-to-speech provider
//!
//! Turns a reply into audio that can be inlined in a JSON response as a
//! `data:` URI, so the client never has to fetch a second resource.

use super::openai::OpenAIErrorResponse;
use super::LlmError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Synthesized audio clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl SpeechAudio {
    pub fn mp3(data: Vec<u8>) -> Self {
        Self {
            media_type: "audio/mpeg".to_string(),
            data,
        }
    }

    /// Self-contained `data:<media>;base64,<payload>` URI
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, BASE64.encode(&self.data))
    }
}

/// Common interface for speech synthesis providers
#[async_trait]
pub trait SpeechService: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, LlmError>;

    fn voice(&self) -> &str;
}

/// `OpenAI` `audio/speech` implementation
pub struct OpenAISpeechService {
    client: Client,
    api_key: String,
    model: String,
    voice: String,
    endpoint: String,
}

impl OpenAISpeechService {
    pub fn new(
        api_key: String,
        model: &str,
        voice: &str,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            voice: voice.to_string(),
            endpoint: format!("{}/audio/speech", base_url.trim_end_matches('/')),
        })
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
    response_format: &'a str,
}

#[async_trait]
impl SpeechService for OpenAISpeechService {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio, LlmError> {
        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
            response_format: "mp3",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAIErrorResponse>(&body)
                .map_or(body, |resp| resp.error.message);
            return Err(LlmError::from_status(status.as_u16(), &message));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read audio: {e}")))?;

        if bytes.is_empty() {
            return Err(LlmError::empty_response("Speech provider returned no audio"));
        }

        Ok(SpeechAudio::mp3(bytes.to_vec()))
    }

    fn voice(&self) -> &str {
        &self.voice
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_encoding() {
        let audio = SpeechAudio::mp3(b"ID3".to_vec());
        assert_eq!(audio.to_data_uri(), "data:audio/mpeg;base64,SUQz");
    }

    #[test]
    fn test_speech_endpoint() {
        let base_url = "https://api.openai.com/v1";
        let service =
            OpenAISpeechService::new("sk-test".into(), "tts-1", "alloy", base_url).unwrap();
        assert_eq!(service.endpoint, "https://api.openai.com/v1/audio/speech");
        assert_eq!(service.voice(), "alloy");
    }

    #[test]
    fn test_request_shape() {
        let request = SpeechRequest {
            model: "tts-1",
            voice: "alloy",
            input: "I'm scared.",
            response_format: "mp3",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "tts-1");
        assert_eq!(json["voice"], "alloy");
        assert_eq!(json["input"], "I'm scared.");
    }
}
