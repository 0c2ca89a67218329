//! Feature Layout - Transaction feature schema
//!
//! Slot order is fixed at model-build time. The scaler and the classifier
//! were both fitted against exactly this order.
//!
//! ## Rules
//! 1. Add, remove or reorder a slot → increment FEATURE_VERSION
//! 2. Retrain the scaler and classifier against the new layout

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Timing (0) ===
    "step",                  // 0: Simulation time step (hours)

    // === Amounts and balances (1-5) ===
    "amount",                // 1: Transaction amount
    "oldbalanceOrg",         // 2: Sender balance before
    "newbalanceOrig",        // 3: Sender balance after
    "oldbalanceDest",        // 4: Receiver balance before
    "newbalanceDest",        // 5: Receiver balance after

    // === Transaction type one-hot (6-9) ===
    "type_TRANSFER",         // 6
    "type_CASH_OUT",         // 7
    "type_PAYMENT",          // 8
    "type_CASH_IN",          // 9
];

/// Total number of features
pub const FEATURE_COUNT: usize = 10;

/// First slot of the transaction-type indicators
pub const INDICATOR_OFFSET: usize = 6;

const _: () = assert!(FEATURE_LAYOUT.len() == FEATURE_COUNT);

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over the version and every slot name, in order
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Layout description exposed on the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}
