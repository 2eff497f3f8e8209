//! Frame data types

use serde::Serialize;

use crate::assay_pipeline::common::error::FormatError;
use crate::assay_pipeline::frame::orientation::{rotate_clockwise, rotate_counter_clockwise};

/// Where a frame's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameOrigin {
    /// Streamed by the reader's microcontroller
    Device,
    /// Loaded from a saved dataset
    Dataset,
    /// Synthetic pattern produced in simulation mode, never a real measurement
    Simulated,
}

/// One sensor capture in canonical (rotated) orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Columns of the rotated grid
    pub(super) width: usize,
    /// Rows of the rotated grid
    pub(super) height: usize,
    /// Row-major pixel values, `width * height` long
    pub(super) pixels: Vec<u8>,
    pub(super) origin: FrameOrigin,
}

impl Frame {
    /// Builds a frame from samples in the device's streaming order: `sensor_height`
    /// rows of `sensor_width` values, rotated clockwise into canonical orientation.
    pub fn from_sensor_order(
        samples: Vec<u8>,
        sensor_width: usize,
        sensor_height: usize,
        origin: FrameOrigin,
    ) -> Result<Self, FormatError> {
        let expected = sensor_width * sensor_height;
        if samples.len() != expected {
            return Err(FormatError::WrongSampleCount {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width: sensor_height,
            height: sensor_width,
            pixels: rotate_clockwise(&samples, sensor_height, sensor_width),
            origin,
        })
    }

    /// Wraps pixels that are already in canonical orientation.
    pub fn from_canonical(
        width: usize,
        height: usize,
        pixels: Vec<u8>,
        origin: FrameOrigin,
    ) -> Result<Self, FormatError> {
        if pixels.len() != width * height {
            return Err(FormatError::WrongSampleCount {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels, origin })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> FrameOrigin {
        self.origin
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Pixels back in the device's streaming order (the inverse of
    /// [`Frame::from_sensor_order`]): `width` rows of `height` values.
    pub fn sensor_order(&self) -> Vec<u8> {
        rotate_counter_clockwise(&self.pixels, self.height, self.width)
    }

    /// Copies the `size x size` block with top-left corner `(x, y)`, row-major.
    /// The block must lie inside the frame.
    pub fn window(&self, x: usize, y: usize, size: usize) -> Vec<u8> {
        debug_assert!(x + size <= self.width && y + size <= self.height);
        let mut out = Vec::with_capacity(size * size);
        for row in y..y + size {
            out.extend_from_slice(&self.row(row)[x..x + size]);
        }
        out
    }
}
