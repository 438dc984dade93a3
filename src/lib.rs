//! CareView - PEARLS communication trainer
//!
//! Trainees practise difficult clinical conversations with a simulated
//! patient. The server side generates the patient's replies (and optional
//! speech) through an OpenAI-compatible provider; the session controller,
//! rubric navigator and voice state machine drive a client.

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod api;
pub mod chat;
pub mod llm;
pub mod persona;
pub mod rubric;
pub mod session;
pub mod state_machine;
pub mod vitals;

#[cfg(test)]
mod testing;
