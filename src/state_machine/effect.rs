//! Effects produced by state transitions

/// Effects to be executed by the host after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEffect {
    /// Start (or restart) the speech recognition engine
    StartRecognition,

    /// Stop the speech recognition engine
    StopRecognition,

    /// Update the live transcript indicator
    ShowTranscript { text: String },

    /// Submit the final transcript as a chat turn
    SendMessage { text: String },

    /// Play the reply audio
    PlayAudio { url: String },

    /// Surface a non-fatal error to the user
    ReportError { message: String },
}

impl VoiceEffect {
    pub fn send_message(text: impl Into<String>) -> Self {
        VoiceEffect::SendMessage { text: text.into() }
    }

    pub fn report_error(message: impl Into<String>) -> Self {
        VoiceEffect::ReportError {
            message: message.into(),
        }
    }
}
