//! Scoring Pipeline
//!
//! validate → normalize → score → decide. Every per-request failure
//! is returned as a `ScoringError`; classifier panics are caught here and
//! never escape to the server.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::error::{panic_message, ScoringError, ScoringResult};
use super::features::{self, FeatureVector};
use super::model::{Classifier, DecisionPolicy, EngineStatus, ScalingParameters, ScoreResult, ScoringEngine};

/// Immutable after construction; share behind an `Arc`.
#[derive(Debug)]
pub struct ScoringPipeline {
    scaling: ScalingParameters,
    engine: ScoringEngine,
    policy: DecisionPolicy,
}

impl ScoringPipeline {
    pub fn new(
        scaling: ScalingParameters,
        classifier: Arc<dyn Classifier>,
        policy: DecisionPolicy,
    ) -> ScoringResult<Self> {
        let engine = ScoringEngine::new(classifier)?;
        Ok(Self { scaling, engine, policy })
    }

    /// Validate a raw `/predict` body and score it
    pub fn score_payload(&self, body: &[u8]) -> ScoringResult<ScoreResult> {
        let raw = features::parse_payload(body)?;
        self.score(&raw)
    }

    /// Score an already-validated raw vector
    pub fn score(&self, raw: &FeatureVector) -> ScoringResult<ScoreResult> {
        let types = raw.transaction_types();
        if types.len() > 1 {
            tracing::debug!(?types, "Several transaction type indicators set");
        }

        let normalized = self.scaling.normalize(raw);

        let probability = panic::catch_unwind(AssertUnwindSafe(|| self.engine.score(&normalized)))
            .map_err(|payload| {
                ScoringError::inference(format!("classifier panicked: {}", panic_message(&*payload)))
            })??;

        Ok(self.policy.decide(probability))
    }

    pub fn engine_status(&self) -> EngineStatus {
        self.engine.status()
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::logic::features::FEATURE_COUNT;
    use crate::logic::model::{ClassifierFn, Label, QuantumClassifier};

    const SCENARIO_A: &[u8] = br#"{"features": [1, 9000, 9000, 0, 0, 9000, 1, 0, 0, 0]}"#;

    fn quantum_pipeline() -> ScoringPipeline {
        let weights: Vec<Vec<[f64; 3]>> = (0..3)
            .map(|l| {
                (0..FEATURE_COUNT)
                    .map(|q| [0.2 * l as f64, 0.5 + 0.1 * q as f64, -0.3 * q as f64])
                    .collect()
            })
            .collect();
        let classifier = QuantumClassifier::new(FEATURE_COUNT, weights).unwrap();

        let mean = [180.0, 150_000.0, 800_000.0, 820_000.0, 1_100_000.0, 1_200_000.0, 0.08, 0.35, 0.34, 0.22];
        let scale = [140.0, 600_000.0, 2_900_000.0, 2_900_000.0, 3_300_000.0, 3_600_000.0, 0.28, 0.48, 0.47, 0.41];
        let scaling = ScalingParameters::new(&mean, &scale).unwrap();

        ScoringPipeline::new(scaling, Arc::new(classifier), DecisionPolicy::default()).unwrap()
    }

    /// Stub returning a fixed probability and counting calls after the startup check
    fn counting(p: f64) -> (ScoringPipeline, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let classifier = ClassifierFn::new("counting", move |_: &FeatureVector| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(p)
        });
        let pipeline =
            ScoringPipeline::new(ScalingParameters::identity(), Arc::new(classifier), DecisionPolicy::default())
                .unwrap();
        calls.store(0, Ordering::SeqCst);
        (pipeline, calls)
    }

    #[test]
    fn test_scenario_a_full_drain_transfer() {
        let result = quantum_pipeline().score_payload(SCENARIO_A).unwrap();
        assert!((0.0..=1.0).contains(&result.probability));
        assert_eq!(result.label == Label::Fraudulent, result.probability > 0.5);
    }

    #[test]
    fn test_scenario_b_short_vector_skips_classifier() {
        let (pipeline, calls) = counting(0.9);
        let err = pipeline
            .score_payload(br#"{"features": [1, 9000, 9000, 0, 0, 9000, 1, 0, 0]}"#)
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_any_wrong_length_is_invalid_input() {
        let (pipeline, calls) = counting(0.9);
        for len in [0usize, 1, 5, 9, 11, 20] {
            let body = serde_json::json!({ "features": vec![0.0; len] }).to_string();
            let err = pipeline.score_payload(body.as_bytes()).unwrap_err();
            assert!(matches!(err, ScoringError::InvalidInput(_)), "len {}", len);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scenario_c_non_numeric_entry() {
        let (pipeline, calls) = counting(0.9);
        let err = pipeline
            .score_payload(br#"{"features": [1, "lots", 9000, 0, 0, 9000, 1, 0, 0, 0]}"#)
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_scenario_d_classifier_error() {
        let classifier = ClassifierFn::new("unstable", |v: &FeatureVector| {
            if v.get(1) == Some(0.0) {
                Ok(0.2)
            } else {
                Err(ScoringError::inference("numeric instability"))
            }
        });
        let pipeline =
            ScoringPipeline::new(ScalingParameters::identity(), Arc::new(classifier), DecisionPolicy::default())
                .unwrap();

        let err = pipeline.score_payload(SCENARIO_A).unwrap_err();
        assert_eq!(err, ScoringError::inference("numeric instability"));
    }

    #[test]
    fn test_scenario_d_classifier_panic() {
        let classifier = ClassifierFn::new("panicking", |v: &FeatureVector| {
            if v.get(1) == Some(0.0) {
                Ok(0.2)
            } else {
                panic!("tensor shape mismatch")
            }
        });
        let pipeline =
            ScoringPipeline::new(ScalingParameters::identity(), Arc::new(classifier), DecisionPolicy::default())
                .unwrap();

        let err = pipeline.score_payload(SCENARIO_A).unwrap_err();
        assert_eq!(err, ScoringError::inference("classifier panicked: tensor shape mismatch"));

        // Still usable afterwards
        let ok = pipeline.score(&FeatureVector::zeros()).unwrap();
        assert_eq!(ok.probability, 0.2);
    }

    #[test]
    fn test_overflowing_normalization_is_inference_failure() {
        let classifier = QuantumClassifier::new(FEATURE_COUNT, vec![vec![[0.0; 3]; FEATURE_COUNT]]).unwrap();
        let mut scale = [1.0; FEATURE_COUNT];
        scale[1] = 1e-300;
        let scaling = ScalingParameters::new(&[0.0; FEATURE_COUNT], &scale).unwrap();
        let pipeline = ScoringPipeline::new(scaling, Arc::new(classifier), DecisionPolicy::default()).unwrap();

        let mut values = [0.0; FEATURE_COUNT];
        values[1] = 1e300;
        let err = pipeline.score(&FeatureVector::from_values(values)).unwrap_err();
        assert!(matches!(err, ScoringError::InferenceFailure(_)));
    }

    #[test]
    fn test_label_consistent_with_threshold() {
        let pipeline = quantum_pipeline();
        for k in 0..25 {
            let x = k as f64;
            let raw = FeatureVector::from_values([
                x + 1.0,
                x * 40_000.0,
                x * 90_000.0,
                x * 10_000.0,
                x * 5_000.0,
                x * 70_000.0,
                (k % 2) as f64,
                ((k + 1) % 2) as f64,
                0.0,
                0.0,
            ]);
            let result = pipeline.score(&raw).unwrap();
            assert!((0.0..=1.0).contains(&result.probability));
            assert_eq!(result.label == Label::Fraudulent, result.probability > 0.5);
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let pipeline = quantum_pipeline();
        let first = pipeline.score_payload(SCENARIO_A).unwrap();
        for _ in 0..5 {
            let again = pipeline.score_payload(SCENARIO_A).unwrap();
            assert_eq!(again.probability.to_bits(), first.probability.to_bits());
            assert_eq!(again.label, first.label);
        }

        // A second pipeline built from the same artifacts agrees
        let other = quantum_pipeline().score_payload(SCENARIO_A).unwrap();
        assert_eq!(other.probability.to_bits(), first.probability.to_bits());
    }

    #[test]
    fn test_stub_boundary_probabilities() {
        let (pipeline, _) = counting(0.5);
        assert_eq!(pipeline.score(&FeatureVector::zeros()).unwrap().label, Label::Legitimate);

        let (pipeline, calls) = counting(0.5000001);
        assert_eq!(pipeline.score(&FeatureVector::zeros()).unwrap().label, Label::Fraudulent);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
