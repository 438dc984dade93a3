//! `OpenAI` and `OpenAI`-compatible chat completion provider

use super::error::excerpt;
use super::types::{LlmMessage, LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-compatible chat completions service
pub struct OpenAIService {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAIService {
    pub fn new(api_key: String, model: &str, base_url: &str) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.to_string(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    fn translate_request(&self, request: &LlmRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if !request.system.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(request.system.clone()),
            });
        }

        messages.extend(request.messages.iter().map(Self::translate_message));

        OpenAIRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: false,
        }
    }

    fn translate_message(msg: &LlmMessage) -> OpenAIMessage {
        OpenAIMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.text.clone()),
        }
    }

    fn normalize_response(resp: OpenAIResponse) -> Result<LlmResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::empty_response("No choices in response"))?;

        let text = choice
            .message
            .content
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::empty_response("No response from AI"))?;

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_tokens),
            output_tokens: u64::from(u.completion_tokens),
        });

        Ok(LlmResponse { text, usage })
    }
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let openai_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<OpenAIErrorResponse>(&body) {
                return Err(LlmError::from_status(status.as_u16(), &error_resp.error.message));
            }
            return Err(LlmError::from_status(status.as_u16(), &body));
        }

        let openai_response: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %excerpt(&body),
                "Unparseable completion response"
            );
            LlmError::unknown(format!("Failed to parse response: {e}"))
        })?;

        Self::normalize_response(openai_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIErrorResponse {
    pub(super) error: OpenAIError,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIError {
    pub(super) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmErrorKind;

    fn service() -> OpenAIService {
        OpenAIService::new("sk-test".to_string(), "gpt-3.5-turbo", "https://api.openai.com/v1/")
            .unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            service().endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_translate_puts_system_first() {
        let request = LlmRequest {
            system: "You are the patient.".to_string(),
            messages: vec![
                LlmMessage::user("Good morning"),
                LlmMessage::assistant("Morning, doc."),
                LlmMessage::user("How is the pain?"),
            ],
            max_tokens: Some(150),
            temperature: Some(0.7),
        };

        let translated = service().translate_request(&request);
        let json = serde_json::to_value(&translated).unwrap();

        let roles: Vec<&str> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(json["messages"][0]["content"], "You are the patient.");
        assert_eq!(json["max_tokens"], 150);
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_normalize_trims_reply() {
        let resp: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "  It still hurts.  " },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16 }
        }))
        .unwrap();

        let normalized = OpenAIService::normalize_response(resp).unwrap();
        assert_eq!(normalized.text, "It still hurts.");
        assert_eq!(normalized.usage.input_tokens, 12);
        assert_eq!(normalized.usage.output_tokens, 4);
    }

    #[test]
    fn test_normalize_rejects_empty_content() {
        let resp: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": "   " },
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let err = OpenAIService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::EmptyResponse);
    }

    #[test]
    fn test_normalize_rejects_no_choices() {
        let resp: OpenAIResponse =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        let err = OpenAIService::normalize_response(resp).unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::EmptyResponse);
    }
}
