//! Sensor orientation policy.
//!
//! The device streams its rows in an orientation rotated 90 degrees
//! counter-clockwise relative to the cartridge layout, so every frame is turned
//! clockwise exactly once at assembly time. ROI coordinates are expressed in
//! the rotated space.

/// Rotates a row-major `rows x cols` grid 90 degrees clockwise.
///
/// The result is row-major with `cols` rows of `rows` values each:
/// `out[i][j] = in[rows - 1 - j][i]`.
pub fn rotate_clockwise(data: &[u8], rows: usize, cols: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = Vec::with_capacity(data.len());
    for i in 0..cols {
        for j in 0..rows {
            out.push(data[(rows - 1 - j) * cols + i]);
        }
    }
    out
}

/// Inverse of [`rotate_clockwise`]: turns a row-major `rows x cols` grid 90
/// degrees counter-clockwise, giving `cols` rows of `rows` values.
pub fn rotate_counter_clockwise(data: &[u8], rows: usize, cols: usize) -> Vec<u8> {
    debug_assert_eq!(data.len(), rows * cols);
    let mut out = Vec::with_capacity(data.len());
    for i in 0..cols {
        for j in 0..rows {
            out.push(data[j * cols + (cols - 1 - i)]);
        }
    }
    out
}
