//! API request and response types
//!
//! Shared by the server handlers and the trainer client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[serde(alias = "ai", alias = "patient")]
    Assistant,
}

/// Prior turn sent along with a chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub sender: Sender,
    pub text: String,
}

/// Request to generate the patient's next utterance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryTurn>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn with_case_type(mut self, case_type: impl Into<String>) -> Self {
        self.case_type = Some(case_type.into());
        self
    }

    /// Message with surrounding whitespace removed, `None` when blank
    pub fn trimmed_message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    pub fn history(&self) -> &[HistoryTurn] {
        self.history.as_deref().unwrap_or_default()
    }
}

/// Successful chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Response listing the selectable case types
#[derive(Debug, Serialize, Deserialize)]
pub struct CasesResponse {
    pub cases: Vec<String>,
    pub default: Option<String>,
}

/// One rubric step as rendered by clients
#[derive(Debug, Serialize, Deserialize)]
pub struct RubricStepInfo {
    pub name: String,
    pub description: String,
    pub example: String,
}

/// Response with the full rubric
#[derive(Debug, Serialize, Deserialize)]
pub struct RubricResponse {
    pub steps: Vec<RubricStepInfo>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_legacy_sender_names() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"How are you?","history":[{"sender":"user","text":"Hi"},{"sender":"ai","text":"Hello"}],"caseType":"Breaking Bad News"}"#,
        )
        .unwrap();

        assert_eq!(req.trimmed_message(), Some("How are you?"));
        assert_eq!(req.history()[1].sender, Sender::Assistant);
        assert_eq!(req.case_type.as_deref(), Some("Breaking Bad News"));
    }

    #[test]
    fn test_request_tolerates_missing_and_null_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"history":null}"#).unwrap();
        assert!(req.message.is_none());
        assert!(req.history().is_empty());
        assert!(req.trimmed_message().is_none());
    }

    #[test]
    fn test_blank_message_is_none() {
        assert!(ChatRequest::new("  \n\t ").trimmed_message().is_none());
    }

    #[test]
    fn test_reply_uses_camel_case_and_omits_missing_audio() {
        let reply = ChatReply {
            message: "I'm fine.".into(),
            audio_url: None,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["message"], "I'm fine.");
        assert!(json.get("audioUrl").is_none());
        assert!(json["timestamp"].is_string());

        let with_audio = ChatReply {
            audio_url: Some("data:audio/mpeg;base64,AAAA".into()),
            ..reply
        };
        let json = serde_json::to_value(&with_audio).unwrap();
        assert_eq!(json["audioUrl"], "data:audio/mpeg;base64,AAAA");
    }

    #[test]
    fn test_request_serializes_case_type_camel_case() {
        let req = ChatRequest::new("Hello").with_case_type("Conflict Resolution");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["caseType"], "Conflict Resolution");
        assert!(json.get("history").is_none());
    }
}
