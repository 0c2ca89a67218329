//! Model Module - Scoring components
//!
//! Scaling, the variational classifier, the engine wrapping it,
//! and the decision threshold. Kept apart from request handling so
//! any piece can be swapped or tested alone.

pub mod circuit;
pub mod inference;
pub mod loader;
pub mod scaling;
pub mod threshold;

// Re-export common types
pub use circuit::QuantumClassifier;
pub use inference::{Classifier, ClassifierFn, EngineStatus, ScoringEngine, SerializedClassifier};
pub use loader::{load_artifacts, LoadedArtifacts, ModelMetadata};
pub use scaling::ScalingParameters;
pub use threshold::{DecisionPolicy, Label, ScoreResult, DECISION_THRESHOLD};
