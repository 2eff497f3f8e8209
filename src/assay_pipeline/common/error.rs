use thiserror::Error;

/// Failures of a single frame acquisition from the device.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Device sent too few pixels: collected {collected} of {expected}")]
    Incomplete { collected: usize, expected: usize },

    #[error("Byte source failed: {0}")]
    Transport(#[from] std::io::Error),
}

/// Failures of loading a frame from a saved dataset.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Dataset holds {actual} values, expected exactly {expected}")]
    WrongSampleCount { expected: usize, actual: usize },

    #[error("Invalid value {token:?} at line {line}, column {column}: {reason}")]
    ParseFailure {
        line: usize,
        column: usize,
        token: String,
        reason: String,
    },

    #[error("Failed to read dataset {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Operations requested in the wrong session state or with malformed arguments.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("No frame available: capture or load a frame first")]
    NoFrame,

    #[error("Expected exactly 4 ROI centers, got {0}")]
    WrongRoiCount(usize),

    #[error("Simulation mode is disabled in the reader config")]
    SimulationDisabled,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("ROI side {roi_size} does not fit a {width}x{height} frame")]
    RoiTooLarge {
        roi_size: usize,
        width: usize,
        height: usize,
    },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },

    #[error("Trigger token must not be empty")]
    EmptyTrigger,

    #[error("Failed to read config file: {0}")]
    Unreadable(String),

    #[error("Failed to parse config: {0}")]
    Invalid(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
