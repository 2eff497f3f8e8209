//! Result export module
//!
//! Sinks that persist what the pipeline produced: CSV files for raw datasets
//! and normalized ROI samples, and TIFF previews of frames. None of this is
//! called by the pipeline itself.

mod csv;
mod frame_writer;
mod tiff_frame_writer;

pub use csv::{timestamped_csv_path, write_dataset_csv, write_normalized_csv};
pub use frame_writer::{FrameWriter, render_preview};
pub use tiff_frame_writer::{TiffCompression, TiffFrameWriter};
