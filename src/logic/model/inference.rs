//! Inference Engine - classifier capability and scoring wrapper
//!
//! The pipeline only sees `Classifier::predict(normalized) -> probability`.
//! Any backend meeting that contract can be swapped in, including stub
//! closures in tests.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::circuit::QuantumClassifier;
use crate::logic::error::{ScoringError, ScoringResult};
use crate::logic::features::FeatureVector;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Opaque pretrained scoring function
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Probability of fraud in [0, 1] for an already-normalized vector
    fn predict(&self, normalized: &FeatureVector) -> ScoringResult<f64>;
}

impl Classifier for QuantumClassifier {
    fn name(&self) -> &str {
        "quantum-variational"
    }

    fn predict(&self, normalized: &FeatureVector) -> ScoringResult<f64> {
        if !normalized.is_finite() {
            return Err(ScoringError::inference(
                "normalized features overflowed to a non-finite value",
            ));
        }
        Ok(self.probability(normalized))
    }
}

/// Adapts a plain function or closure into a classifier
pub struct ClassifierFn<F> {
    name: String,
    f: F,
}

impl<F> ClassifierFn<F>
where
    F: Fn(&FeatureVector) -> ScoringResult<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Classifier for ClassifierFn<F>
where
    F: Fn(&FeatureVector) -> ScoringResult<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, normalized: &FeatureVector) -> ScoringResult<f64> {
        (self.f)(normalized)
    }
}

/// Runs every evaluation of the inner classifier under one lock.
///
/// For backends whose evaluation primitive is not reentrant.
pub struct SerializedClassifier<C> {
    inner: Mutex<C>,
    name: String,
}

impl<C: Classifier> SerializedClassifier<C> {
    pub fn new(inner: C) -> Self {
        let name = format!("{} (serialized)", inner.name());
        Self { inner: Mutex::new(inner), name }
    }
}

impl<C: Classifier> Classifier for SerializedClassifier<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, normalized: &FeatureVector) -> ScoringResult<f64> {
        self.inner.lock().predict(normalized)
    }
}

// ============================================================================
// SCORING ENGINE
// ============================================================================

/// Engine status for the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub classifier: String,
    pub inference_count: u64,
    pub avg_latency_us: f64,
    /// Set once the classifier has produced an out-of-range output
    pub faulted: bool,
}

/// Wraps one loaded classifier, shared read-only by every request
pub struct ScoringEngine {
    classifier: Arc<dyn Classifier>,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
    faulted: AtomicBool,
}

impl ScoringEngine {
    /// Score the zero vector once before accepting traffic
    pub fn new(classifier: Arc<dyn Classifier>) -> ScoringResult<Self> {
        let baseline = classifier.predict(&FeatureVector::zeros()).map_err(|e| {
            ScoringError::startup(format!("classifier '{}' failed its startup check: {}", classifier.name(), e))
        })?;

        if !is_probability(baseline) {
            return Err(ScoringError::startup(format!(
                "classifier '{}' returned {} for the zero vector, outside [0, 1]",
                classifier.name(),
                baseline
            )));
        }

        tracing::debug!(classifier = classifier.name(), baseline, "Scoring engine ready");

        Ok(Self {
            classifier,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
            faulted: AtomicBool::new(false),
        })
    }

    pub fn is_faulted(&self) -> bool {
        self.faulted.load(Ordering::Acquire)
    }

    /// An out-of-range output means the artifact itself is broken: the
    /// engine latches the fault and refuses every later request.
    pub fn score(&self, normalized: &FeatureVector) -> ScoringResult<f64> {
        if self.is_faulted() {
            return Err(ScoringError::startup(format!(
                "classifier '{}' is misconfigured and has been disabled",
                self.classifier.name()
            )));
        }

        let start = Instant::now();

        let probability = self.classifier.predict(normalized).map_err(|e| match e {
            ScoringError::InferenceFailure(_) => e,
            other => ScoringError::inference(other.to_string()),
        })?;

        self.latency_sum_us
            .fetch_add(start.elapsed().as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if !is_probability(probability) {
            self.faulted.store(true, Ordering::Release);
            tracing::error!(
                classifier = self.classifier.name(),
                probability,
                "Classifier produced an out-of-range probability; artifact is misconfigured, scoring disabled"
            );
            return Err(ScoringError::startup(format!(
                "classifier '{}' returned {}, outside [0, 1]",
                self.classifier.name(),
                probability
            )));
        }

        Ok(probability)
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { sum as f64 / count as f64 } else { 0.0 };

        EngineStatus {
            classifier: self.classifier.name().to_string(),
            inference_count: count,
            avg_latency_us: avg,
            faulted: self.is_faulted(),
        }
    }
}

impl fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

fn is_probability(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}
