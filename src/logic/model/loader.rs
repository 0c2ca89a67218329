//! Artifact loader
//!
//! Reads the scaler and circuit artifacts once at startup. Every failure
//! here is a startup configuration error; the service must not serve.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::circuit::{CircuitArtifact, QuantumClassifier};
use super::scaling::{ScalerArtifact, ScalingParameters};
use crate::logic::error::{ScoringError, ScoringResult};

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub scaler_path: String,
    pub n_qubits: usize,
    pub n_layers: usize,
    /// SHA-256 over the scaler and model artifact bytes
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

pub struct LoadedArtifacts {
    pub scaling: ScalingParameters,
    pub classifier: QuantumClassifier,
    pub metadata: ModelMetadata,
}

pub fn load_artifacts(scaler_path: &Path, model_path: &Path) -> ScoringResult<LoadedArtifacts> {
    tracing::info!(
        scaler = %scaler_path.display(),
        model = %model_path.display(),
        "Loading scoring artifacts"
    );

    let scaler_bytes = read(scaler_path)?;
    let model_bytes = read(model_path)?;

    let scaler: ScalerArtifact = serde_json::from_slice(&scaler_bytes).map_err(|e| {
        ScoringError::startup(format!("invalid scaler artifact {}: {}", scaler_path.display(), e))
    })?;
    let scaling = ScalingParameters::try_from(scaler)?;

    let circuit: CircuitArtifact = serde_json::from_slice(&model_bytes).map_err(|e| {
        ScoringError::startup(format!("invalid model artifact {}: {}", model_path.display(), e))
    })?;
    let classifier = QuantumClassifier::try_from(circuit)?;

    let mut hasher = Sha256::new();
    hasher.update(&scaler_bytes);
    hasher.update(&model_bytes);
    let fingerprint = format!("{:x}", hasher.finalize());

    let metadata = ModelMetadata {
        model_path: model_path.display().to_string(),
        scaler_path: scaler_path.display().to_string(),
        n_qubits: classifier.n_qubits(),
        n_layers: classifier.n_layers(),
        fingerprint,
        loaded_at: Utc::now(),
    };

    tracing::info!(
        n_qubits = metadata.n_qubits,
        n_layers = metadata.n_layers,
        fingerprint = %metadata.fingerprint,
        "Artifacts loaded"
    );

    Ok(LoadedArtifacts { scaling, classifier, metadata })
}

fn read(path: &Path) -> ScoringResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| ScoringError::startup(format!("cannot read {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use crate::logic::features::{layout_hash, FeatureVector, FEATURE_COUNT};

    const SCALER: &str = r#"{"mean": [1,1,1,1,1,1,0,0,0,0], "scale": [2,2,2,2,2,2,1,1,1,1]}"#;

    fn write(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn model_json(layers: usize, hash: Option<u32>) -> String {
        let weights = vec![vec![[0.1, 0.2, 0.3]; FEATURE_COUNT]; layers];
        serde_json::json!({
            "n_qubits": FEATURE_COUNT,
            "n_layers": layers,
            "weights": weights,
            "feature_layout_hash": hash,
        })
        .to_string()
    }

    #[test]
    fn test_load_valid_artifacts() {
        let scaler = write(SCALER);
        let model = write(&model_json(3, Some(layout_hash())));

        let loaded = load_artifacts(scaler.path(), model.path()).unwrap();
        assert_eq!(loaded.metadata.n_qubits, FEATURE_COUNT);
        assert_eq!(loaded.metadata.n_layers, 3);
        assert_eq!(loaded.metadata.fingerprint.len(), 64);
        // (3 - 1) / 2 on the first slot
        let normalized = loaded.scaling.normalize(&FeatureVector::from_values([3.0; FEATURE_COUNT]));
        assert_eq!(normalized.get(0), Some(1.0));
        assert_eq!(normalized.get(6), Some(3.0));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let scaler = write(SCALER);
        let model = write(&model_json(2, None));

        let a = load_artifacts(scaler.path(), model.path()).unwrap();
        let b = load_artifacts(scaler.path(), model.path()).unwrap();
        assert_eq!(a.metadata.fingerprint, b.metadata.fingerprint);
    }

    #[test]
    fn test_missing_file() {
        let model = write(&model_json(1, None));
        let err = load_artifacts(Path::new("/nonexistent/scaler.json"), model.path())
            .err()
            .unwrap();
        assert!(matches!(err, ScoringError::StartupConfiguration(_)));
    }

    #[test]
    fn test_malformed_scaler() {
        let scaler = write("not json");
        let model = write(&model_json(1, None));
        let err = load_artifacts(scaler.path(), model.path()).err().unwrap();
        assert!(err.to_string().contains("invalid scaler artifact"));
    }

    #[test]
    fn test_wrong_scaler_length() {
        let scaler = write(r#"{"mean": [0,0,0], "scale": [1,1,1]}"#);
        let model = write(&model_json(1, None));
        let err = load_artifacts(scaler.path(), model.path()).err().unwrap();
        assert!(matches!(err, ScoringError::StartupConfiguration(_)));
    }

    #[test]
    fn test_layout_mismatch() {
        let scaler = write(SCALER);
        let model = write(&model_json(1, Some(layout_hash() ^ 0xffff)));
        let err = load_artifacts(scaler.path(), model.path()).err().unwrap();
        assert!(err.to_string().contains("feature layout mismatch"));
    }
}
