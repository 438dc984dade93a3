//! Mock vital signs
//!
//! Readings are cosmetic. They drift in response to trigger words in the
//! trainee's latest message and are clamped so repeated triggers saturate
//! instead of running away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_HEART_RATE: u16 = 72;
const DEFAULT_SYSTOLIC: u16 = 120;
const DEFAULT_DIASTOLIC: u16 = 80;
const DEFAULT_SPO2: u8 = 98;
const DEFAULT_TEMPERATURE_C: f32 = 37.0;

const HEART_RATE_STEP: u16 = 8;
const HEART_RATE_CEILING: u16 = 130;
const HEART_RATE_ALERT: u16 = 100;

const SYSTOLIC_STEP: u16 = 6;
const DIASTOLIC_STEP: u16 = 3;
const SYSTOLIC_CEILING: u16 = 170;
const DIASTOLIC_CEILING: u16 = 100;
const SYSTOLIC_ALERT: u16 = 140;

const SPO2_STEP: u8 = 2;
const SPO2_FLOOR: u8 = 88;
const SPO2_ALERT: u8 = 92;

const TEMPERATURE_STEP_C: f32 = 0.4;
const TEMPERATURE_CEILING_C: f32 = 39.5;
const TEMPERATURE_ALERT_C: f32 = 38.0;

const PAIN_WORDS: &[&str] = &["pain", "hurt", "hurts", "ache", "aching"];
const DISTRESS_WORDS: &[&str] = &[
    "cancer", "tumor", "tumour", "mass", "die", "dying", "terminal", "worried", "scared", "afraid",
];
const BREATHING_WORDS: &[&str] = &["breath", "breathing", "breathe", "short of breath"];
const FEVER_WORDS: &[&str] = &["fever", "chills", "infection"];

/// A single reading and whether it is out of range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading<T> {
    pub value: T,
    pub alert: bool,
}

impl<T> Reading<T> {
    fn normal(value: T) -> Self {
        Self {
            value,
            alert: false,
        }
    }
}

/// Blood pressure in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u16,
    pub diastolic: u16,
}

impl std::fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

/// Snapshot of every displayed reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub heart_rate: Reading<u16>,
    pub blood_pressure: Reading<BloodPressure>,
    pub oxygen_saturation: Reading<u8>,
    pub temperature: Reading<f32>,
    pub alerts: Vec<String>,
}

impl Default for VitalsSnapshot {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            heart_rate: Reading::normal(DEFAULT_HEART_RATE),
            blood_pressure: Reading::normal(BloodPressure {
                systolic: DEFAULT_SYSTOLIC,
                diastolic: DEFAULT_DIASTOLIC,
            }),
            oxygen_saturation: Reading::normal(DEFAULT_SPO2),
            temperature: Reading::normal(DEFAULT_TEMPERATURE_C),
            alerts: Vec::new(),
        }
    }
}

impl VitalsSnapshot {
    /// Same readings as `Default`, ignoring the timestamp
    pub fn is_baseline(&self) -> bool {
        let baseline = Self {
            timestamp: self.timestamp,
            ..Self::default()
        };
        *self == baseline
    }

    /// Nudge readings for trigger words in `message`. Returns whether
    /// anything changed.
    pub fn apply_message(&mut self, message: &str) -> bool {
        let words = tokenize(message);
        let lowered = message.to_lowercase();
        let hit = |triggers: &[&str]| {
            triggers.iter().any(|t| {
                if t.contains(' ') {
                    lowered.contains(t)
                } else {
                    words.iter().any(|w| w == t)
                }
            })
        };

        let mut changed = false;

        if hit(PAIN_WORDS) {
            let hr = &mut self.heart_rate;
            hr.value = (hr.value + HEART_RATE_STEP).min(HEART_RATE_CEILING);
            hr.alert = hr.value > HEART_RATE_ALERT;
            changed = true;
        }

        if hit(DISTRESS_WORDS) {
            let bp = &mut self.blood_pressure;
            bp.value.systolic = (bp.value.systolic + SYSTOLIC_STEP).min(SYSTOLIC_CEILING);
            bp.value.diastolic = (bp.value.diastolic + DIASTOLIC_STEP).min(DIASTOLIC_CEILING);
            bp.alert = bp.value.systolic > SYSTOLIC_ALERT;
            changed = true;
        }

        if hit(BREATHING_WORDS) {
            let spo2 = &mut self.oxygen_saturation;
            spo2.value = spo2.value.saturating_sub(SPO2_STEP).max(SPO2_FLOOR);
            spo2.alert = spo2.value < SPO2_ALERT;
            changed = true;
        }

        if hit(FEVER_WORDS) {
            let temp = &mut self.temperature;
            temp.value = (temp.value + TEMPERATURE_STEP_C).min(TEMPERATURE_CEILING_C);
            temp.alert = temp.value > TEMPERATURE_ALERT_C;
            changed = true;
        }

        if changed {
            self.timestamp = Utc::now();
            self.alerts = self.collect_alerts();
        }
        changed
    }

    fn collect_alerts(&self) -> Vec<String> {
        let mut alerts = Vec::new();
        if self.heart_rate.alert {
            alerts.push(format!("Tachycardia: {} bpm", self.heart_rate.value));
        }
        if self.blood_pressure.alert {
            alerts.push(format!("Elevated blood pressure: {} mmHg", self.blood_pressure.value));
        }
        if self.oxygen_saturation.alert {
            alerts.push(format!(
                "Low oxygen saturation: {}%",
                self.oxygen_saturation.value
            ));
        }
        if self.temperature.alert {
            alerts.push(format!("Fever: {:.1}°C", self.temperature.value));
        }
        alerts
    }
}

fn tokenize(message: &str) -> Vec<String> {
    message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let vitals = VitalsSnapshot::default();
        assert_eq!(vitals.heart_rate.value, 72);
        assert_eq!(vitals.blood_pressure.value.to_string(), "120/80");
        assert_eq!(vitals.oxygen_saturation.value, 98);
        assert!((vitals.temperature.value - 37.0).abs() < f32::EPSILON);
        assert!(vitals.alerts.is_empty());
        assert!(vitals.is_baseline());
    }

    #[test]
    fn test_pain_raises_heart_rate_to_ceiling() {
        let mut vitals = VitalsSnapshot::default();
        assert!(vitals.apply_message("Where is the pain?"));
        assert_eq!(vitals.heart_rate.value, 80);
        assert!(!vitals.heart_rate.alert);

        for _ in 0..20 {
            vitals.apply_message("Does it hurt?");
        }
        assert_eq!(vitals.heart_rate.value, HEART_RATE_CEILING);
        assert!(vitals.heart_rate.alert);
        assert!(vitals.alerts.iter().any(|a| a.starts_with("Tachycardia")));
    }

    #[test]
    fn test_unrelated_message_changes_nothing() {
        let mut vitals = VitalsSnapshot::default();
        assert!(!vitals.apply_message("Good morning, how did you sleep?"));
        assert!(vitals.is_baseline());
    }

    #[test]
    fn test_matches_whole_words_only() {
        let mut vitals = VitalsSnapshot::default();
        // "painting" must not count as "pain"
        assert!(!vitals.apply_message("I hear you enjoy painting."));
        assert_eq!(vitals.heart_rate.value, DEFAULT_HEART_RATE);
    }

    #[test]
    fn test_distress_raises_blood_pressure() {
        let mut vitals = VitalsSnapshot::default();
        for _ in 0..30 {
            vitals.apply_message("The scan shows a mass, it may be cancer.");
        }
        assert_eq!(vitals.blood_pressure.value.systolic, SYSTOLIC_CEILING);
        assert_eq!(vitals.blood_pressure.value.diastolic, DIASTOLIC_CEILING);
        assert!(vitals.blood_pressure.alert);
    }

    #[test]
    fn test_breathing_lowers_saturation_to_floor() {
        let mut vitals = VitalsSnapshot::default();
        for _ in 0..10 {
            vitals.apply_message("Are you short of breath?");
        }
        assert_eq!(vitals.oxygen_saturation.value, SPO2_FLOOR);
        assert!(vitals.oxygen_saturation.alert);
    }

    #[test]
    fn test_fever_raises_temperature() {
        let mut vitals = VitalsSnapshot::default();
        for _ in 0..10 {
            vitals.apply_message("Any fever or chills?");
        }
        assert!(vitals.temperature.value <= TEMPERATURE_CEILING_C);
        assert!(vitals.temperature.alert);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(VitalsSnapshot::default()).unwrap();
        assert_eq!(json["heartRate"]["value"], 72);
        assert_eq!(json["bloodPressure"]["value"]["systolic"], 120);
        assert_eq!(json["oxygenSaturation"]["alert"], false);
    }
}
