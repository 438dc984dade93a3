//! Events reported by the speech engine, the audio element and the network

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    // User events
    StartListening,
    StopListening,

    // Speech recognition events
    InterimTranscript { text: String },
    FinalTranscript { text: String },
    /// The engine stopped on its own (silence timeout, etc.)
    RecognitionEnded,
    RecognitionError { message: String },

    // Response service events
    ReplyReceived { audio_url: Option<String> },
    ReplyFailed { message: String },

    // Playback events
    PlaybackEnded,
    PlaybackFailed { message: String },
}

impl VoiceEvent {
    pub fn name(&self) -> &'static str {
        match self {
            VoiceEvent::StartListening => "start_listening",
            VoiceEvent::StopListening => "stop_listening",
            VoiceEvent::InterimTranscript { .. } => "interim_transcript",
            VoiceEvent::FinalTranscript { .. } => "final_transcript",
            VoiceEvent::RecognitionEnded => "recognition_ended",
            VoiceEvent::RecognitionError { .. } => "recognition_error",
            VoiceEvent::ReplyReceived { .. } => "reply_received",
            VoiceEvent::ReplyFailed { .. } => "reply_failed",
            VoiceEvent::PlaybackEnded => "playback_ended",
            VoiceEvent::PlaybackFailed { .. } => "playback_failed",
        }
    }
}
