use std::io::Write;

use crate::assay_pipeline::common::error::ExportError;
use crate::assay_pipeline::frame::Frame;
use crate::assay_pipeline::roi::RoiCenter;

/// Encodes a frame preview to some image format.
pub trait FrameWriter {
    /// `overlay` outlines the ROI windows around the given centers.
    fn write_frame(
        &self,
        frame: &Frame,
        overlay: Option<(&[RoiCenter; 4], usize)>,
        output: &mut dyn Write,
    ) -> Result<(), ExportError>;
}

/// Nearest-neighbour upscale of the frame by `scale`, with optional white ROI
/// outlines. Returns `(width, height, pixels)`.
///
/// Overlay centers are clamped like extraction clamps them; an overlay whose
/// window cannot fit the frame is not drawn.
pub fn render_preview(
    frame: &Frame,
    overlay: Option<(&[RoiCenter; 4], usize)>,
    scale: usize,
) -> (usize, usize, Vec<u8>) {
    let scale = scale.max(1);
    let (width, height) = (frame.width() * scale, frame.height() * scale);
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = frame.row(y / scale);
        pixels.extend((0..width).map(|x| row[x / scale]));
    }

    let overlay = overlay.filter(|&(_, roi_size)| {
        roi_size > 0 && roi_size <= frame.width().min(frame.height())
    });
    if let Some((centers, roi_size)) = overlay {
        for center in centers {
            let (x0, y0) = center
                .clamp_to(frame.width(), frame.height(), roi_size)
                .top_left(roi_size);
            let (left, top) = (x0 * scale, y0 * scale);
            let right = ((x0 + roi_size) * scale).min(width) - 1;
            let bottom = ((y0 + roi_size) * scale).min(height) - 1;
            for x in left..=right {
                pixels[top * width + x] = u8::MAX;
                pixels[bottom * width + x] = u8::MAX;
            }
            for y in top..=bottom {
                pixels[y * width + left] = u8::MAX;
                pixels[y * width + right] = u8::MAX;
            }
        }
    }

    (width, height, pixels)
}
