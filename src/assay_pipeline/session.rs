//! Reader session module
//!
//! Owns the current frame and runs the acquisition and extraction cycle:
//! `Idle -> Acquiring -> FrameReady -> Extracting -> ResultReady`.

mod frame_slot;
mod reader_session;
mod report;
mod timing;

#[cfg(test)]
mod tests;

pub use frame_slot::FrameSlot;
pub use reader_session::{ReaderSession, SessionState};
pub use report::ExtractionReport;
pub use timing::{PipelineTimings, StepTiming, Timer};
