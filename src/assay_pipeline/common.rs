//! Common utilities module
//!
//! This module contains the error types shared across the assay pipeline.

pub mod error;

pub use error::{
    AcquisitionError,
    ConfigError,
    ExportError,
    FormatError,
    ReaderError,
    Result,
    StateError,
};
