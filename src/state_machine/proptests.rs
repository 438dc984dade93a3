//! Property-based tests for the voice state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("   ".to_string()), "[a-zA-Z ]{1,30}"]
}

fn arb_state() -> impl Strategy<Value = VoiceState> {
    prop_oneof![
        Just(VoiceState::Idle),
        arb_text().prop_map(|interim| VoiceState::Listening { interim }),
        "[a-zA-Z]{1,20}".prop_map(|text| VoiceState::Sending { text }),
        Just(VoiceState::Playing),
    ]
}

fn arb_event() -> impl Strategy<Value = VoiceEvent> {
    prop_oneof![
        Just(VoiceEvent::StartListening),
        Just(VoiceEvent::StopListening),
        arb_text().prop_map(|text| VoiceEvent::InterimTranscript { text }),
        arb_text().prop_map(|text| VoiceEvent::FinalTranscript { text }),
        Just(VoiceEvent::RecognitionEnded),
        "[a-z ]{1,20}".prop_map(|message| VoiceEvent::RecognitionError { message }),
        proptest::option::of("data:audio/mpeg;base64,[A-Z]{4}")
            .prop_map(|audio_url| VoiceEvent::ReplyReceived { audio_url }),
        "[a-z ]{1,20}".prop_map(|message| VoiceEvent::ReplyFailed { message }),
        Just(VoiceEvent::PlaybackEnded),
        "[a-z ]{1,20}".prop_map(|message| VoiceEvent::PlaybackFailed { message }),
    ]
}

fn count_sends(effects: &[VoiceEffect]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, VoiceEffect::SendMessage { .. }))
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// SendMessage appears exactly when entering Sending, with the same text
    #[test]
    fn prop_send_only_on_entering_sending(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            let entered = !matches!(state, VoiceState::Sending { .. })
                && matches!(result.new_state, VoiceState::Sending { .. });
            let sends = count_sends(&result.effects);
            prop_assert_eq!(sends, usize::from(entered));

            let send_effect = result
                .effects
                .iter()
                .find(|e| matches!(e, VoiceEffect::SendMessage { .. }));
            if let (VoiceState::Sending { text }, Some(VoiceEffect::SendMessage { text: sent })) =
                (&result.new_state, send_effect)
            {
                prop_assert_eq!(text, sent);
                prop_assert!(!text.trim().is_empty());
            }
        }
    }

    /// PlayAudio only appears when entering Playing
    #[test]
    fn prop_play_implies_playing(state in arb_state(), event in arb_event()) {
        if let Ok(result) = transition(&state, event) {
            let plays = result.effects.iter().any(|e| matches!(e, VoiceEffect::PlayAudio { .. }));
            let entered = matches!(result.new_state, VoiceState::Playing)
                && !matches!(state, VoiceState::Playing);
            prop_assert_eq!(plays, entered);
        }
    }

    /// Over any event sequence, at most one send is outstanding at a time
    #[test]
    fn prop_at_most_one_outstanding_send(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut machine = VoiceMachine::new();
        let mut outstanding = 0usize;

        for event in events {
            let settles = matches!(
                event,
                VoiceEvent::ReplyReceived { .. } | VoiceEvent::ReplyFailed { .. }
            );
            let before = machine.state().clone();
            match machine.handle(event) {
                Ok(effects) => {
                    if settles && matches!(before, VoiceState::Sending { .. }) {
                        outstanding -= 1;
                    }
                    outstanding += count_sends(&effects);
                    prop_assert!(outstanding <= 1);
                    let sending = matches!(machine.state(), VoiceState::Sending { .. });
                    prop_assert_eq!(outstanding == 1, sending);
                }
                Err(_) => prop_assert_eq!(machine.state(), &before),
            }
        }
    }

    /// The transition function is deterministic
    #[test]
    fn prop_transition_is_pure(state in arb_state(), event in arb_event()) {
        let a = transition(&state, event.clone());
        let b = transition(&state, event);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.new_state, b.new_state);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "transition was not deterministic"),
        }
    }
}
