//! Provider configuration and service construction

use super::speech::{OpenAISpeechService, SpeechService};
use super::{LlmService, LoggingService, OpenAIService};
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TTS_MODEL: &str = "tts-1";
pub const DEFAULT_TTS_VOICE: &str = "alloy";

/// Environment variable holding the provider credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Configuration for the completion and speech providers
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub chat_model: String,
    pub tts_model: String,
    pub tts_voice: String,
    pub tts_enabled: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
            tts_enabled: true,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: get(API_KEY_VAR),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            chat_model: get("CAREVIEW_CHAT_MODEL").unwrap_or(defaults.chat_model),
            tts_model: get("CAREVIEW_TTS_MODEL").unwrap_or(defaults.tts_model),
            tts_voice: get("CAREVIEW_TTS_VOICE").unwrap_or(defaults.tts_voice),
            tts_enabled: get("CAREVIEW_TTS_ENABLED").map_or(defaults.tts_enabled, |v| {
                !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
            }),
        }
    }

    /// Completion service wrapped with logging, or `None` without a credential.
    pub fn completion_service(&self) -> Option<Arc<dyn LlmService>> {
        let api_key = self.api_key.as_ref()?;
        match OpenAIService::new(api_key.clone(), &self.chat_model, &self.base_url) {
            Ok(service) => Some(Arc::new(LoggingService::new(Arc::new(service)))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to build completion client");
                None
            }
        }
    }

    /// Speech service, or `None` when disabled or without a credential.
    pub fn speech_service(&self) -> Option<Arc<dyn SpeechService>> {
        if !self.tts_enabled {
            return None;
        }
        let api_key = self.api_key.as_ref()?;
        match OpenAISpeechService::new(
            api_key.clone(),
            &self.tts_model,
            &self.tts_voice,
            &self.base_url,
        ) {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build speech client, audio disabled");
                None
            }
        }
    }
}
