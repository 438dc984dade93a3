//! Voice interaction state machine
//!
//! Speech recognition and reply playback are callback driven. Every callback
//! is funnelled through a pure transition function (Elm Architecture) that
//! returns the next state plus the effects the host must run.
//!
//! This is a library surface for a browser or other audio-capable host; the
//! terminal trainer is text only and does not drive it. A host runs
//! `SendMessage` through [`crate::session::Session::submit`] and feeds the
//! outcome back as `ReplyReceived` or `ReplyFailed`.

mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use effect::VoiceEffect;
pub use event::VoiceEvent;
pub use state::VoiceState;
pub use transition::{transition, TransitionError, TransitionResult};

/// Owns the current state and applies events to it
#[derive(Debug, Default)]
pub struct VoiceMachine {
    state: VoiceState,
}

impl VoiceMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &VoiceState {
        &self.state
    }

    /// Apply an event. On error the state is left unchanged.
    pub fn handle(&mut self, event: VoiceEvent) -> Result<Vec<VoiceEffect>, TransitionError> {
        let event_name = event.name();
        let result = transition(&self.state, event)?;
        tracing::debug!(
            from = self.state.name(),
            to = result.new_state.name(),
            event = event_name,
            effects = result.effects.len(),
            "Voice transition"
        );
        self.state = result.new_state;
        Ok(result.effects)
    }
}
