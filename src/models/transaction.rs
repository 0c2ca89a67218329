//! Named-field transaction model
//!
//! Dashboard input assembled into the ordered feature vector on the
//! server. Carries the same guards the dashboard applies before submitting.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::logic::features::{FeatureVector, TransactionType, FEATURE_COUNT};
use crate::logic::model::{Label, ScoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_sender_balance"))]
pub struct TransactionRequest {
    #[validate(range(min = 1.0, message = "Step must be at least 1."))]
    pub step: f64,

    #[validate(range(exclusive_min = 0.0, message = "Amount must be greater than zero."))]
    pub amount: f64,

    #[serde(rename = "oldbalanceOrg")]
    #[validate(range(min = 0.0, message = "Sender's previous balance cannot be negative."))]
    pub old_balance_org: f64,

    #[serde(rename = "newbalanceOrig")]
    #[validate(range(min = 0.0, message = "Sender's new balance cannot be negative."))]
    pub new_balance_orig: f64,

    #[serde(rename = "oldbalanceDest")]
    #[validate(range(min = 0.0, message = "Receiver's previous balance cannot be negative."))]
    pub old_balance_dest: f64,

    #[serde(rename = "newbalanceDest")]
    #[validate(range(min = 0.0, message = "Receiver's new balance cannot be negative."))]
    pub new_balance_dest: f64,

    #[serde(default)]
    pub type_transfer: bool,
    #[serde(default)]
    pub type_cash_out: bool,
    #[serde(default)]
    pub type_payment: bool,
    #[serde(default)]
    pub type_cash_in: bool,
}

fn validate_sender_balance(tx: &TransactionRequest) -> Result<(), ValidationError> {
    if tx.old_balance_org < tx.new_balance_orig {
        let mut err = ValidationError::new("sender_balance");
        err.message = Some("Sender's previous balance cannot be less than new balance.".into());
        return Err(err);
    }
    Ok(())
}

impl TransactionRequest {
    pub fn is_type(&self, kind: TransactionType) -> bool {
        match kind {
            TransactionType::Transfer => self.type_transfer,
            TransactionType::CashOut => self.type_cash_out,
            TransactionType::Payment => self.type_payment,
            TransactionType::CashIn => self.type_cash_in,
        }
    }

    /// Assemble the ordered feature vector
    pub fn to_features(&self) -> FeatureVector {
        let mut values = [0.0f64; FEATURE_COUNT];
        values[0] = self.step;
        values[1] = self.amount;
        values[2] = self.old_balance_org;
        values[3] = self.new_balance_orig;
        values[4] = self.old_balance_dest;
        values[5] = self.new_balance_dest;

        for kind in TransactionType::ALL {
            if self.is_type(kind) {
                values[kind.slot()] = 1.0;
            }
        }

        FeatureVector::from_values(values)
    }
}

/// Flatten validator output into one deterministic message
pub fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid ({})", field, e.code),
            })
        })
        .collect();

    messages.sort();
    messages.join(" ")
}

/// `/predict/transaction` success body
#[derive(Debug, Clone, Serialize)]
pub struct TransactionAssessment {
    pub prediction: u8,
    pub confidence: f64,
    pub label: Label,
    pub transaction: TransactionRequest,
}

impl TransactionAssessment {
    pub fn new(result: ScoreResult, transaction: TransactionRequest) -> Self {
        Self {
            prediction: result.label.prediction(),
            confidence: result.probability,
            label: result.label,
            transaction,
        }
    }
}
