//! Scaling Transform - per-feature standardisation
//!
//! `normalized[i] = (raw[i] - mean[i]) / scale[i]`, with parameters fitted at
//! training time. Parameters are validated once when constructed; after that
//! `normalize` has no error path.

use serde::{Deserialize, Serialize};

use crate::logic::error::{ScoringError, ScoringResult};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Raw serialized form, as written by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

/// Validated, immutable scaling parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingParameters {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl ScalingParameters {
    /// Validate lengths and values. Any violation is a startup error.
    pub fn new(mean: &[f64], scale: &[f64]) -> ScoringResult<Self> {
        if mean.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            return Err(ScoringError::startup(format!(
                "scaling parameters must have {} entries (mean: {}, scale: {})",
                FEATURE_COUNT,
                mean.len(),
                scale.len()
            )));
        }

        let mut m = [0.0f64; FEATURE_COUNT];
        let mut s = [1.0f64; FEATURE_COUNT];

        for i in 0..FEATURE_COUNT {
            if !mean[i].is_finite() {
                return Err(ScoringError::startup(format!("scaling mean[{}] is not finite", i)));
            }
            if !scale[i].is_finite() || scale[i] == 0.0 {
                return Err(ScoringError::startup(format!(
                    "scaling scale[{}] must be finite and non-zero, got {}",
                    i, scale[i]
                )));
            }
            m[i] = mean[i];
            s[i] = scale[i];
        }

        Ok(Self { mean: m, scale: s })
    }

    /// mean = 0, scale = 1
    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    pub fn normalize(&self, raw: &FeatureVector) -> FeatureVector {
        let raw = raw.as_array();
        let mut normalized = [0.0f64; FEATURE_COUNT];

        for i in 0..FEATURE_COUNT {
            normalized[i] = (raw[i] - self.mean[i]) / self.scale[i];
        }

        FeatureVector::from_values(normalized)
    }
}

impl TryFrom<ScalerArtifact> for ScalingParameters {
    type Error = ScoringError;

    fn try_from(artifact: ScalerArtifact) -> ScoringResult<Self> {
        Self::new(&artifact.mean, &artifact.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FeatureVector {
        FeatureVector::from_values([1.0, 9000.0, 9000.0, 0.0, 0.0, 9000.0, 1.0, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_identity_is_noop() {
        let raw = sample();
        assert_eq!(ScalingParameters::identity().normalize(&raw), raw);
    }

    #[test]
    fn test_affine_formula() {
        let mean = [1.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 0.5];
        let scale = [2.0, 50.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5];
        let params = ScalingParameters::new(&mean, &scale).unwrap();

        let out = params.normalize(&sample());
        assert_eq!(out.get(0), Some(0.0));
        assert_eq!(out.get(1), Some((9000.0 - 100.0) / 50.0));
        assert_eq!(out.get(6), Some(1.0));
        assert_eq!(out.get(7), Some(-1.0));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let params = ScalingParameters::new(&[3.0; 10], &[7.0; 10]).unwrap();
        let a = params.normalize(&sample());
        let b = params.normalize(&sample());
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_length_is_startup_error() {
        let err = ScalingParameters::new(&[0.0; 9], &[1.0; 10]).unwrap_err();
        assert!(matches!(err, ScoringError::StartupConfiguration(_)));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut scale = [1.0; 10];
        scale[4] = 0.0;
        let err = ScalingParameters::new(&[0.0; 10], &scale).unwrap_err();
        assert!(err.to_string().contains("scale[4]"));
    }

    #[test]
    fn test_artifact_accepts_sklearn_names() {
        let artifact: ScalerArtifact = serde_json::from_str(
            r#"{"mean_": [0,0,0,0,0,0,0,0,0,0], "scale_": [1,1,1,1,1,1,1,1,1,1]}"#,
        )
        .unwrap();
        let params = ScalingParameters::try_from(artifact).unwrap();
        assert_eq!(params, ScalingParameters::identity());
    }
}
