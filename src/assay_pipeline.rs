//! Frame acquisition and ROI scoring pipeline
//!
//! This module turns the ASCII pixel stream of the reader's microcontroller into
//! a canonical frame, then extracts, normalizes and scores the four assay regions.
//! Acquisition, frame handling, ROI extraction, analysis and result export live in
//! separate modules; `session` ties them together.

pub mod common;
pub mod config;
pub mod acquisition;
pub mod frame;
pub mod roi;
pub mod analysis;
pub mod session;
pub mod export;

pub use common::{
    AcquisitionError,
    ConfigError,
    ExportError,
    FormatError,
    ReaderError,
    Result,
    StateError,
};

pub use config::{
    Cutoffs,
    FrameGeometry,
    ReaderConfig,
    ReaderConfigBuilder,
};

pub use acquisition::{
    ByteSource,
    FrameAssembler,
    ReadOutcome,
    ScriptedSource,
    TcpSource,
    TokenStreamDecoder,
};

pub use frame::{
    Frame,
    FrameOrigin,
    load_dataset,
    load_dataset_file,
    rotate_clockwise,
};

pub use roi::{
    RoiCenter,
    RoiKind,
    extract,
};

pub use analysis::{
    Analyte,
    AnalyteResult,
    ClassificationResult,
    Normalized,
    Status,
    classify,
    normalize,
    score,
};

pub use session::{
    ExtractionReport,
    FrameSlot,
    PipelineTimings,
    ReaderSession,
    SessionState,
    StepTiming,
    Timer,
};

pub use export::{
    FrameWriter,
    render_preview,
    TiffCompression,
    TiffFrameWriter,
    timestamped_csv_path,
    write_dataset_csv,
    write_normalized_csv,
};
