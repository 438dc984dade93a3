//! PEARLS communication rubric
//!
//! A fixed, ordered checklist of communication techniques with a cursor that
//! steps through it. The cursor clamps at both ends.

/// One PEARLS technique
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubricStep {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

pub const PEARLS_STEPS: &[RubricStep] = &[
    RubricStep {
        name: "Partnership",
        description: "Working together with the patient to address their concerns",
        example: "Let's work through this together and figure out the next steps as a team.",
    },
    RubricStep {
        name: "Empathy",
        description: "Recognizing and acknowledging the patient's emotions",
        example: "I can see how frightening this news is for you.",
    },
    RubricStep {
        name: "Apology",
        description: "Expressing regret for the patient's situation",
        example: "I'm sorry you've had to wait so long for answers.",
    },
    RubricStep {
        name: "Respect",
        description: "Showing appreciation for the patient's efforts and strengths",
        example: "You've done a great job keeping track of your symptoms.",
    },
    RubricStep {
        name: "Legitimization",
        description: "Validating the patient's feelings and experiences",
        example: "Anyone in your position would feel overwhelmed right now.",
    },
    RubricStep {
        name: "Support",
        description: "Offering assistance and reassurance to the patient",
        example: "We'll be here with you every step of the way.",
    },
];

/// Cursor over [`PEARLS_STEPS`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RubricNavigator {
    index: usize,
}

impl RubricNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn len(self) -> usize {
        PEARLS_STEPS.len()
    }

    pub fn is_empty(self) -> bool {
        PEARLS_STEPS.is_empty()
    }

    pub fn current(self) -> &'static RubricStep {
        &PEARLS_STEPS[self.index]
    }

    pub fn is_first(self) -> bool {
        self.index == 0
    }

    pub fn is_last(self) -> bool {
        self.index + 1 >= PEARLS_STEPS.len()
    }

    /// Move forward one step; stays on the last step. Returns whether it moved.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Move back one step; stays on the first step. Returns whether it moved.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
