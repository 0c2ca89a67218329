//! Feature Vector - Core data structure for classifier input
//!
//! One transaction encoded as exactly FEATURE_COUNT ordered values.
//! Built per request, never mutated after construction, never persisted.

use serde::{Deserialize, Serialize};

use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT, INDICATOR_OFFSET};
use crate::logic::error::{ScoringError, ScoringResult};

// ============================================================================
// TRANSACTION TYPE
// ============================================================================

/// One-hot transaction type slots, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Transfer,
    CashOut,
    Payment,
    CashIn,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Transfer,
        TransactionType::CashOut,
        TransactionType::Payment,
        TransactionType::CashIn,
    ];

    /// Index of this type's indicator slot
    pub fn slot(self) -> usize {
        INDICATOR_OFFSET
            + match self {
                TransactionType::Transfer => 0,
                TransactionType::CashOut => 1,
                TransactionType::Payment => 2,
                TransactionType::CashIn => 3,
            }
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn zeros() -> Self {
        Self { values: [0.0; FEATURE_COUNT] }
    }

    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Build from a slice, rejecting wrong length or non-finite values
    pub fn from_slice(values: &[f64]) -> ScoringResult<Self> {
        check_length(values.len())?;

        let mut array = [0.0f64; FEATURE_COUNT];
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(ScoringError::invalid_input(format!(
                    "feature {} ('{}') is not finite",
                    i, FEATURE_LAYOUT[i]
                )));
            }
            array[i] = v;
        }

        Ok(Self::from_values(array))
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// Every transaction type whose indicator slot is 1.
    ///
    /// More than one type may be marked; exclusivity is not enforced.
    pub fn transaction_types(&self) -> Vec<TransactionType> {
        TransactionType::ALL
            .into_iter()
            .filter(|t| self.values[t.slot()] == 1.0)
            .collect()
    }
}

/// Reject any vector length other than FEATURE_COUNT
pub(crate) fn check_length(len: usize) -> ScoringResult<()> {
    if len != FEATURE_COUNT {
        return Err(ScoringError::invalid_input(format!(
            "expected {} features, got {}",
            FEATURE_COUNT, len
        )));
    }
    Ok(())
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_exact_length() {
        let v = FeatureVector::from_slice(&[1.0, 9000.0, 9000.0, 0.0, 0.0, 9000.0, 1.0, 0.0, 0.0, 0.0])
            .unwrap();
        assert_eq!(v.get(1), Some(9000.0));
        assert_eq!(v.get(6), Some(1.0));
        assert_eq!(v.get(10), None);
    }

    #[test]
    fn test_from_slice_wrong_length() {
        let err = FeatureVector::from_slice(&[0.0; 9]).unwrap_err();
        assert_eq!(err, ScoringError::invalid_input("expected 10 features, got 9"));

        assert!(FeatureVector::from_slice(&[0.0; 11]).is_err());
        assert!(FeatureVector::from_slice(&[]).is_err());
    }

    #[test]
    fn test_from_slice_rejects_non_finite() {
        let mut values = [0.0; FEATURE_COUNT];
        values[1] = f64::NAN;
        let err = FeatureVector::from_slice(&values).unwrap_err();
        assert!(err.to_string().contains("'amount'"));

        values[1] = f64::INFINITY;
        assert!(FeatureVector::from_slice(&values).is_err());
    }

    #[test]
    fn test_transaction_types() {
        let mut values = [0.0; FEATURE_COUNT];
        assert!(FeatureVector::from_values(values).transaction_types().is_empty());

        values[TransactionType::CashOut.slot()] = 1.0;
        assert_eq!(
            FeatureVector::from_values(values).transaction_types(),
            vec![TransactionType::CashOut]
        );

        // Multiple indicators are reported as-is
        values[TransactionType::Transfer.slot()] = 1.0;
        assert_eq!(
            FeatureVector::from_values(values).transaction_types(),
            vec![TransactionType::Transfer, TransactionType::CashOut]
        );
    }
}
