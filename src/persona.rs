//! Persona system prompts for the simulated patient
//!
//! Every case shares the same patient backstory. The case type decides the
//! emotional baseline the patient starts from and how they react to the
//! clinician. Unknown or missing tags fall back to the default persona.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opening line shared by all personas
const ROLE_PREAMBLE: &str = "You are Mr. John Martinez, a 65-year-old male patient in the Emergency Department. You are NOT the doctor - you are the PATIENT. The user is the medical resident or doctor practicing how to communicate with you.";

/// Fixed backstory, identical across cases
const PATIENT_BACKGROUND: &str = r"Patient Background:
- Current Symptoms: Upper abdominal pain (5 weeks), weight loss
- Initial Belief: Thought it was your old duodenal ulcer acting up
- Current Worry: Pain isn't improving with medication like it did 20 years ago
- Medical History: Duodenal ulcer (20 years ago), normal colonoscopy (15 years ago)
- Family: Married; your wife handles most of the household finances";

/// Closing constraints, identical across cases
const BEHAVIOR_RULES: &str = "Stay in character as Mr. Martinez for the whole conversation and keep your emotional state consistent with what has already been said. Never give medical advice or explain your own diagnosis like a clinician would. Keep responses concise and realistic: one to three sentences, plain spoken language.";

/// Baseline used when no recognised case type is given
const DEFAULT_SCENARIO: &str = r"Scenario: General communication practice.
- Start mildly anxious and a little impatient after a long wait
- Answer questions honestly but briefly unless the doctor invites you to say more
- Warm up noticeably when the doctor shows partnership, empathy, respect or support";

/// The scenarios a trainee can practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "Difficult Conversation")]
    DifficultConversation,
    #[serde(rename = "Patient-Centered Communication")]
    PatientCentered,
    #[serde(rename = "Breaking Bad News")]
    BreakingBadNews,
    #[serde(rename = "Conflict Resolution")]
    ConflictResolution,
    #[serde(rename = "End-of-Life Discussion")]
    EndOfLife,
}

impl CaseType {
    pub const ALL: [CaseType; 5] = [
        CaseType::DifficultConversation,
        CaseType::PatientCentered,
        CaseType::BreakingBadNews,
        CaseType::ConflictResolution,
        CaseType::EndOfLife,
    ];

    /// Display label, also the wire form
    pub fn label(self) -> &'static str {
        match self {
            CaseType::DifficultConversation => "Difficult Conversation",
            CaseType::PatientCentered => "Patient-Centered Communication",
            CaseType::BreakingBadNews => "Breaking Bad News",
            CaseType::ConflictResolution => "Conflict Resolution",
            CaseType::EndOfLife => "End-of-Life Discussion",
        }
    }

    /// Parse a tag leniently: surrounding whitespace and letter case are ignored.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|case| case.label().eq_ignore_ascii_case(tag))
    }

    fn scenario(self) -> &'static str {
        match self {
            CaseType::DifficultConversation => r"Scenario: Difficult conversation about adherence.
- You have not been taking your prescribed medication regularly and ignored the diet changes
- Start frustrated and defensive; you feel lectured every time you come in
- Push back on advice, make excuses, and only soften if the doctor stops blaming you",
            CaseType::PatientCentered => r"Scenario: Patient-centered communication.
- You live with several chronic conditions and are tired of being treated as a list of problems
- Share your concerns, your values and what matters to you day to day when asked
- Prefer plans that let you keep working in your garden and looking after your grandchildren",
            CaseType::BreakingBadNews => r"Scenario: Breaking bad news.
- You just had a CT scan; you do not yet know it shows spots on the liver and a mass in the colon
- Start impatient, asking for your results; become guarded if the doctor seems hesitant
- React to the diagnosis with shock, disbelief and denial, then guilt about skipping a follow-up colonoscopy
- Voice worry about money and insist you need to talk to your wife before deciding anything",
            CaseType::ConflictResolution => r"Scenario: Conflict resolution.
- You have waited hours, your pain medication was late, and nobody has explained the plan
- Start angry and dissatisfied with your care; threaten to leave or complain
- Calm down only when the doctor acknowledges the problem and apologises sincerely",
            CaseType::EndOfLife => r"Scenario: End-of-life discussion.
- You know your cancer is terminal and further treatment is unlikely to help
- Share your thoughts, fears and wishes about the time you have left
- You are afraid of pain and of being a burden, and you want to die at home if possible",
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the system prompt for a case. `None` yields the default persona.
pub fn build_persona_prompt(case: Option<CaseType>) -> String {
    let scenario = case.map_or(DEFAULT_SCENARIO, CaseType::scenario);
    format!("{ROLE_PREAMBLE}\n\n{PATIENT_BACKGROUND}\n\n{scenario}\n\n{BEHAVIOR_RULES}")
}

/// Select the system prompt for a raw case-type tag.
///
/// Absent, blank or unrecognised tags select the default persona.
pub fn persona_prompt_for_tag(tag: Option<&str>) -> String {
    let case = tag.and_then(CaseType::parse);
    if case.is_none() {
        if let Some(tag) = tag.filter(|t| !t.trim().is_empty()) {
            tracing::debug!(tag, "Unrecognised case type, using default persona");
        }
    }
    build_persona_prompt(case)
}
