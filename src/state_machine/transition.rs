//! Pure state transition function
//!
//! Given the same state and event this always produces the same result and
//! performs no I/O. The host runs the returned effects.

use super::{VoiceEffect, VoiceEvent, VoiceState};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: VoiceState,
    pub effects: Vec<VoiceEffect>,
}

impl TransitionResult {
    pub fn new(state: VoiceState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: VoiceEffect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("A message is being sent, wait for the reply")]
    RequestInFlight,
    #[error("The reply is still playing")]
    PlaybackInProgress,
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

/// Pure transition function
pub fn transition(
    state: &VoiceState,
    event: VoiceEvent,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Microphone control
        // ============================================================
        (VoiceState::Idle, VoiceEvent::StartListening) => {
            Ok(TransitionResult::new(VoiceState::listening())
                .with_effect(VoiceEffect::StartRecognition))
        }

        (VoiceState::Listening { .. }, VoiceEvent::StopListening) => {
            Ok(TransitionResult::new(VoiceState::Idle)
                .with_effect(VoiceEffect::StopRecognition))
        }

        // No queueing and no cancellation while a turn is outstanding
        (VoiceState::Sending { .. }, VoiceEvent::StartListening | VoiceEvent::StopListening) => {
            Err(TransitionError::RequestInFlight)
        }

        (VoiceState::Playing, VoiceEvent::StartListening | VoiceEvent::StopListening) => {
            Err(TransitionError::PlaybackInProgress)
        }

        // ============================================================
        // Recognition
        // ============================================================
        (VoiceState::Listening { .. }, VoiceEvent::InterimTranscript { text }) => {
            Ok(TransitionResult::new(VoiceState::Listening {
                interim: text.clone(),
            })
            .with_effect(VoiceEffect::ShowTranscript { text }))
        }

        (VoiceState::Listening { .. }, VoiceEvent::FinalTranscript { text }) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Ok(TransitionResult::new(VoiceState::listening()));
            }
            Ok(TransitionResult::new(VoiceState::Sending { text: text.clone() })
                .with_effect(VoiceEffect::StopRecognition)
                .with_effect(VoiceEffect::send_message(text)))
        }

        // Engines stop on silence; restart explicitly instead of relying on
        // continuous mode
        (VoiceState::Listening { interim }, VoiceEvent::RecognitionEnded) => {
            Ok(TransitionResult::new(VoiceState::Listening {
                interim: interim.clone(),
            })
            .with_effect(VoiceEffect::StartRecognition))
        }

        (VoiceState::Listening { .. }, VoiceEvent::RecognitionError { message }) => {
            Ok(TransitionResult::new(VoiceState::Idle)
                .with_effect(VoiceEffect::report_error(message)))
        }

        // ============================================================
        // Reply handling
        // ============================================================
        (VoiceState::Sending { .. }, VoiceEvent::ReplyReceived { audio_url }) => match audio_url {
            Some(url) => Ok(TransitionResult::new(VoiceState::Playing)
                .with_effect(VoiceEffect::PlayAudio { url })),
            None => Ok(TransitionResult::new(VoiceState::listening())
                .with_effect(VoiceEffect::StartRecognition)),
        },

        (VoiceState::Sending { .. }, VoiceEvent::ReplyFailed { message }) => {
            Ok(TransitionResult::new(VoiceState::Idle)
                .with_effect(VoiceEffect::report_error(message)))
        }

        // ============================================================
        // Playback
        // ============================================================
        (VoiceState::Playing, VoiceEvent::PlaybackEnded) => {
            Ok(TransitionResult::new(VoiceState::listening())
                .with_effect(VoiceEffect::StartRecognition))
        }

        (VoiceState::Playing, VoiceEvent::PlaybackFailed { message }) => {
            tracing::warn!(error = %message, "Reply playback failed");
            Ok(TransitionResult::new(VoiceState::listening())
                .with_effect(VoiceEffect::StartRecognition))
        }

        (state, event) => Err(TransitionError::InvalidTransition {
            state: state.name(),
            event: event.name(),
        }),
    }
}
