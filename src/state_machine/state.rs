//! Voice interaction states

use serde::{Deserialize, Serialize};

/// Where the voice loop currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceState {
    /// Microphone off, nothing in flight
    #[default]
    Idle,

    /// Recognition running; `interim` is the partial transcript so far
    Listening { interim: String },

    /// Final transcript sent to the response service, awaiting the reply
    Sending { text: String },

    /// Reply audio is playing
    Playing,
}

impl VoiceState {
    pub fn listening() -> Self {
        VoiceState::Listening {
            interim: String::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VoiceState::Idle => "idle",
            VoiceState::Listening { .. } => "listening",
            VoiceState::Sending { .. } => "sending",
            VoiceState::Playing => "playing",
        }
    }

    /// The microphone control should be disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, VoiceState::Sending { .. } | VoiceState::Playing)
    }

    /// Text to show next to the microphone indicator
    pub fn transcript(&self) -> Option<&str> {
        match self {
            VoiceState::Listening { interim } if !interim.is_empty() => Some(interim),
            VoiceState::Sending { text } => Some(text),
            _ => None,
        }
    }
}
