//! Request / response models

pub mod prediction;
pub mod transaction;

pub use prediction::*;
pub use transaction::*;
