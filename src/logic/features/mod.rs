//! Features Module - Transaction feature encoding
//!
//! Layout, the immutable FeatureVector, and raw payload validation.

pub mod layout;
pub mod validate;
pub mod vector;

pub use layout::{layout_hash, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT};
pub use validate::parse_payload;
pub use vector::{FeatureVector, TransactionType};
