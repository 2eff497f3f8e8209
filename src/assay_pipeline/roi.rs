//! Region of interest module
//!
//! ROI centers, their clamping rules, and extraction of the four assay windows.

mod types;
mod extractor;

pub use types::{RoiCenter, RoiKind};
pub use extractor::{clamped_centers, extract};
