//! Loading frames from saved numeric datasets.
//!
//! A dataset holds the raw samples in the device's streaming order as
//! delimited text: commas, semicolons or whitespace between values, any number
//! of rows. Values may be written as integers or integral decimals (`12`,
//! `12.0`, `1.2e1`). Lines starting with `#` are comments.

use std::path::Path;

use tracing::{debug, instrument};

use crate::assay_pipeline::common::error::FormatError;
use crate::assay_pipeline::config::FrameGeometry;
use crate::assay_pipeline::frame::types::{Frame, FrameOrigin};

fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

fn parse_value(token: &str) -> Result<u8, String> {
    if let Ok(value) = token.parse::<u8>() {
        return Ok(value);
    }
    let value: f64 = token.parse().map_err(|_| "not a number".to_string())?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err("not an integral pixel value".to_string());
    }
    if !(0.0..=255.0).contains(&value) {
        return Err("outside 0..=255".to_string());
    }
    Ok(value as u8)
}

/// Parses dataset text into a frame, rotated exactly like a device capture.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn load_dataset(text: &str, geometry: &FrameGeometry) -> Result<Frame, FormatError> {
    let mut samples = Vec::with_capacity(geometry.sample_count());

    for (line_idx, line) in text.lines().enumerate() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        for (column, token) in line.split(is_separator).filter(|t| !t.is_empty()).enumerate() {
            let value = parse_value(token).map_err(|reason| FormatError::ParseFailure {
                line: line_idx + 1,
                column: column + 1,
                token: token.to_string(),
                reason,
            })?;
            samples.push(value);
        }
    }

    debug!("Parsed {} dataset values", samples.len());
    Frame::from_sensor_order(samples, geometry.width, geometry.height, FrameOrigin::Dataset)
}

pub fn load_dataset_file<P: AsRef<Path>>(path: P, geometry: &FrameGeometry) -> Result<Frame, FormatError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| FormatError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    load_dataset(&text, geometry)
}
