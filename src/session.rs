//! Conversation controller
//!
//! Owns one training session: the transcript for the active case, the mock
//! vitals and the rubric cursor. A turn is split in two halves so the caller
//! can await the network in between:
//!
//! 1. [`Session::begin_turn`] validates input, appends the user message and
//!    marks the session busy. It refuses while another turn is outstanding.
//! 2. [`Session::complete_turn`] appends the reply, or the fallback apology
//!    on failure, and clears the busy flag.
//!
//! Switching case type bumps a generation counter. A turn begun under an
//! older generation is discarded when it completes; the session stays busy
//! until then, so at most one request is ever outstanding.

mod client;

pub use client::{ClientError, HttpResponseClient, ResponseClient};

use crate::api::{ChatReply, ChatRequest, HistoryTurn, Sender};
use crate::persona::CaseType;
use crate::rubric::{RubricNavigator, RubricStep};
use crate::vitals::VitalsSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of the patient's reply when a turn fails
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Could you say that again?";

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn now(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    fn to_history(&self) -> HistoryTurn {
        HistoryTurn {
            sender: self.sender,
            text: self.text.clone(),
        }
    }
}

/// Proof that a turn was started; hand it back to `complete_turn`
#[derive(Debug)]
pub struct TurnTicket {
    generation: u64,
    request: ChatRequest,
}

impl TurnTicket {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// How a completed turn landed in the transcript
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The patient replied; `audio_url` is set when speech is available
    Replied { audio_url: Option<String> },
    /// The request failed and the fallback apology was appended
    Fallback { error: String },
    /// The case changed while the request was in flight
    Discarded,
}

/// State of one training session
#[derive(Debug, Clone)]
pub struct Session {
    case_type: Option<CaseType>,
    transcript: Vec<Message>,
    vitals: VitalsSnapshot,
    rubric: RubricNavigator,
    busy: bool,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Session {
    pub fn new(case_type: Option<CaseType>) -> Self {
        Self {
            case_type,
            transcript: Vec::new(),
            vitals: VitalsSnapshot::default(),
            rubric: RubricNavigator::new(),
            busy: false,
            generation: 0,
        }
    }

    pub fn case_type(&self) -> Option<CaseType> {
        self.case_type
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn vitals(&self) -> &VitalsSnapshot {
        &self.vitals
    }

    pub fn rubric(&self) -> RubricNavigator {
        self.rubric
    }

    pub fn current_step(&self) -> &'static RubricStep {
        self.rubric.current()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Submission is possible: not busy and the input has content.
    pub fn can_submit(&self, input: &str) -> bool {
        !self.busy && !input.trim().is_empty()
    }

    /// Switch case type, resetting transcript, vitals and rubric cursor.
    pub fn select_case(&mut self, case_type: Option<CaseType>) {
        self.case_type = case_type;
        self.transcript.clear();
        self.vitals = VitalsSnapshot::default();
        self.rubric.reset();
        // An in-flight turn keeps `busy` set until its ticket comes back
        self.generation += 1;
        tracing::debug!(
            case_type = case_type.map_or("default", CaseType::label),
            generation = self.generation,
            "Session reset"
        );
    }

    pub fn advance_step(&mut self) -> bool {
        self.rubric.advance()
    }

    pub fn retreat_step(&mut self) -> bool {
        self.rubric.retreat()
    }

    /// Start a turn. Returns `None` for blank input or while busy.
    pub fn begin_turn(&mut self, input: &str) -> Option<TurnTicket> {
        if !self.can_submit(input) {
            return None;
        }
        let text = input.trim();

        let history: Vec<HistoryTurn> = self.transcript.iter().map(Message::to_history).collect();
        let mut request = ChatRequest::new(text).with_history(history);
        if let Some(case) = self.case_type {
            request = request.with_case_type(case.label());
        }

        self.transcript.push(Message::now(Sender::User, text));
        self.vitals.apply_message(text);
        self.busy = true;

        Some(TurnTicket {
            generation: self.generation,
            request,
        })
    }

    /// Finish a turn started with [`Session::begin_turn`].
    pub fn complete_turn(
        &mut self,
        ticket: TurnTicket,
        result: Result<ChatReply, ClientError>,
    ) -> TurnOutcome {
        self.busy = false;
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Dropping reply for a previous case"
            );
            return TurnOutcome::Discarded;
        }

        match result {
            Ok(reply) => {
                self.transcript
                    .push(Message::now(Sender::Assistant, reply.message));
                TurnOutcome::Replied {
                    audio_url: reply.audio_url,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat turn failed, showing fallback reply");
                self.transcript
                    .push(Message::now(Sender::Assistant, FALLBACK_REPLY));
                TurnOutcome::Fallback {
                    error: e.to_string(),
                }
            }
        }
    }

    /// Run a whole turn against `client`. `None` means nothing was sent.
    pub async fn submit(
        &mut self,
        input: &str,
        client: &dyn ResponseClient,
    ) -> Option<TurnOutcome> {
        let ticket = self.begin_turn(input)?;
        let result = client.send(ticket.request()).await;
        Some(self.complete_turn(ticket, result))
    }
}
