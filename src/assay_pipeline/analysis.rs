//! ROI analysis module
//!
//! Shared min/max normalization of the four extracted windows, intensity
//! scoring, and cutoff classification. Everything here is pure.

mod types;
mod normalize;
mod classify;

pub use types::{Analyte, AnalyteResult, ClassificationResult, Normalized, Status};
pub use normalize::normalize;
pub use classify::{classify, score};
