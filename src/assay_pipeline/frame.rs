//! Frame module
//!
//! The canonical frame type, the fixed sensor orientation transform, and the
//! alternate frame sources (saved datasets and the simulation pattern).

mod types;
mod orientation;
mod dataset;
mod simulated;

pub use types::{Frame, FrameOrigin};
pub use orientation::rotate_clockwise;
pub use dataset::{load_dataset, load_dataset_file};
