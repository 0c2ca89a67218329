//! Prediction response model

use serde::{Deserialize, Serialize};

use crate::logic::model::ScoreResult;

/// `/predict` success body: `{"prediction": 0 | 1, "confidence": p}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictResponse {
    pub prediction: u8,
    pub confidence: f64,
}

impl From<ScoreResult> for PredictResponse {
    fn from(result: ScoreResult) -> Self {
        Self {
            prediction: result.label.prediction(),
            confidence: result.probability,
        }
    }
}
