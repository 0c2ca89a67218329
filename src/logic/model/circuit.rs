//! Variational Circuit - statevector simulation of the fraud classifier
//!
//! Angle embedding (RX per wire) followed by strongly entangling layers
//! (Rot on every wire, then a CNOT ring), read out as <Z> on wire 0 and
//! squashed through a sigmoid. Wire 0 is the most significant bit of the
//! basis-state index.

use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::logic::error::{ScoringError, ScoringResult};
use crate::logic::features::{layout_hash, FeatureVector, FEATURE_COUNT};

// ============================================================================
// AMPLITUDE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Amplitude {
    re: f64,
    im: f64,
}

impl Amplitude {
    const ZERO: Amplitude = Amplitude { re: 0.0, im: 0.0 };
    const ONE: Amplitude = Amplitude { re: 1.0, im: 0.0 };

    fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// e^{i·phase}
    fn phase(phase: f64) -> Self {
        Self::new(phase.cos(), phase.sin())
    }

    fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

impl Add for Amplitude {
    type Output = Amplitude;

    fn add(self, rhs: Amplitude) -> Amplitude {
        Amplitude::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Mul for Amplitude {
    type Output = Amplitude;

    fn mul(self, rhs: Amplitude) -> Amplitude {
        Amplitude::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Amplitude {
    type Output = Amplitude;

    fn mul(self, rhs: f64) -> Amplitude {
        Amplitude::new(self.re * rhs, self.im * rhs)
    }
}

type Gate = [[Amplitude; 2]; 2];

fn rx(theta: f64) -> Gate {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [Amplitude::new(c, 0.0), Amplitude::new(0.0, -s)],
        [Amplitude::new(0.0, -s), Amplitude::new(c, 0.0)],
    ]
}

/// Rot(φ, θ, ω) = RZ(ω) · RY(θ) · RZ(φ)
fn rot(phi: f64, theta: f64, omega: f64) -> Gate {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [
            Amplitude::phase(-(phi + omega) / 2.0) * c,
            Amplitude::phase((phi - omega) / 2.0) * -s,
        ],
        [
            Amplitude::phase(-(phi - omega) / 2.0) * s,
            Amplitude::phase((phi + omega) / 2.0) * c,
        ],
    ]
}

// ============================================================================
// STATE VECTOR
// ============================================================================

#[derive(Debug, Clone)]
struct StateVector {
    n_qubits: usize,
    amplitudes: Vec<Amplitude>,
}

impl StateVector {
    /// |0…0⟩
    fn new(n_qubits: usize) -> Self {
        let mut amplitudes = vec![Amplitude::ZERO; 1 << n_qubits];
        amplitudes[0] = Amplitude::ONE;
        Self { n_qubits, amplitudes }
    }

    fn mask(&self, wire: usize) -> usize {
        1 << (self.n_qubits - 1 - wire)
    }

    fn apply(&mut self, gate: &Gate, wire: usize) {
        let mask = self.mask(wire);
        for i in 0..self.amplitudes.len() {
            if i & mask != 0 {
                continue;
            }
            let j = i | mask;
            let a0 = self.amplitudes[i];
            let a1 = self.amplitudes[j];
            self.amplitudes[i] = gate[0][0] * a0 + gate[0][1] * a1;
            self.amplitudes[j] = gate[1][0] * a0 + gate[1][1] * a1;
        }
    }

    fn cnot(&mut self, control: usize, target: usize) {
        let c = self.mask(control);
        let t = self.mask(target);
        for i in 0..self.amplitudes.len() {
            if i & c != 0 && i & t == 0 {
                self.amplitudes.swap(i, i | t);
            }
        }
    }

    /// ⟨Z⟩ on one wire
    fn expval_z(&self, wire: usize) -> f64 {
        let mask = self.mask(wire);
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, a)| if i & mask == 0 { a.norm_sqr() } else { -a.norm_sqr() })
            .sum()
    }
}

// ============================================================================
// CLASSIFIER WEIGHTS
// ============================================================================

/// Serialized classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitArtifact {
    pub n_qubits: usize,
    pub n_layers: usize,
    /// Shape (n_layers, n_qubits, 3)
    pub weights: Vec<Vec<[f64; 3]>>,
    /// CRC32 of the feature layout the circuit was trained against
    #[serde(default)]
    pub feature_layout_hash: Option<u32>,
}

/// Trained variational circuit. Immutable after construction.
#[derive(Debug, Clone)]
pub struct QuantumClassifier {
    n_qubits: usize,
    weights: Vec<Vec<[f64; 3]>>,
}

impl QuantumClassifier {
    pub fn new(n_qubits: usize, weights: Vec<Vec<[f64; 3]>>) -> ScoringResult<Self> {
        if n_qubits != FEATURE_COUNT {
            return Err(ScoringError::startup(format!(
                "circuit has {} qubits, feature layout needs {}",
                n_qubits, FEATURE_COUNT
            )));
        }
        if weights.is_empty() {
            return Err(ScoringError::startup("circuit needs at least one layer"));
        }
        for (l, layer) in weights.iter().enumerate() {
            if layer.len() != n_qubits {
                return Err(ScoringError::startup(format!(
                    "layer {} has {} rotation triples, expected {}",
                    l,
                    layer.len(),
                    n_qubits
                )));
            }
            if layer.iter().flatten().any(|w| !w.is_finite()) {
                return Err(ScoringError::startup(format!("layer {} has non-finite weights", l)));
            }
        }

        Ok(Self { n_qubits, weights })
    }

    pub fn n_qubits(&self) -> usize {
        self.n_qubits
    }

    pub fn n_layers(&self) -> usize {
        self.weights.len()
    }

    /// Expectation value ⟨Z₀⟩ in [-1, 1]
    pub fn expectation(&self, inputs: &FeatureVector) -> f64 {
        let n = self.n_qubits;
        let mut state = StateVector::new(n);

        for (wire, &x) in inputs.as_slice().iter().enumerate() {
            state.apply(&rx(x), wire);
        }

        for (l, layer) in self.weights.iter().enumerate() {
            for (wire, &[phi, theta, omega]) in layer.iter().enumerate() {
                state.apply(&rot(phi, theta, omega), wire);
            }
            if n > 1 {
                let range = (l % (n - 1)) + 1;
                for wire in 0..n {
                    state.cnot(wire, (wire + range) % n);
                }
            }
        }

        state.expval_z(0)
    }

    /// Fraud probability: sigmoid(⟨Z₀⟩)
    pub fn probability(&self, inputs: &FeatureVector) -> f64 {
        sigmoid(self.expectation(inputs))
    }
}

impl TryFrom<CircuitArtifact> for QuantumClassifier {
    type Error = ScoringError;

    fn try_from(artifact: CircuitArtifact) -> ScoringResult<Self> {
        if artifact.weights.len() != artifact.n_layers {
            return Err(ScoringError::startup(format!(
                "artifact declares {} layers but carries {}",
                artifact.n_layers,
                artifact.weights.len()
            )));
        }
        if let Some(hash) = artifact.feature_layout_hash {
            if hash != layout_hash() {
                return Err(ScoringError::startup(format!(
                    "feature layout mismatch: model trained on {:08x}, service uses {:08x}",
                    hash,
                    layout_hash()
                )));
            }
        }

        Self::new(artifact.n_qubits, artifact.weights)
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
