//! Logic Module - Transaction scoring core
//!
//! Independent of HTTP. Handlers only call into `pipeline`.

pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;

pub use error::{ScoringError, ScoringResult};
pub use pipeline::ScoringPipeline;
