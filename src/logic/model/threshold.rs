//! Decision Policy - probability to label
//!
//! Fixed cutoff, strict comparison. Confidence is the raw probability,
//! not recalibrated.

use serde::{Deserialize, Serialize};

/// Probabilities strictly above this are fraudulent
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Fraudulent,
    Legitimate,
}

impl Label {
    /// Wire encoding: 1 = fraudulent, 0 = legitimate
    pub fn prediction(self) -> u8 {
        match self {
            Label::Fraudulent => 1,
            Label::Legitimate => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Fraudulent => "fraudulent",
            Label::Legitimate => "legitimate",
        }
    }
}

/// Outcome of one scored transaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub probability: f64,
    pub label: Label,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn decide(&self, probability: f64) -> ScoreResult {
        let label = if probability > self.threshold {
            Label::Fraudulent
        } else {
            Label::Legitimate
        };

        ScoreResult { probability, label }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self { threshold: DECISION_THRESHOLD }
    }
}
