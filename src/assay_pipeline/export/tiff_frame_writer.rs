use std::io::Write;

use tracing::debug;

use crate::assay_pipeline::common::error::ExportError;
use crate::assay_pipeline::export::frame_writer::{FrameWriter, render_preview};
use crate::assay_pipeline::frame::Frame;
use crate::assay_pipeline::roi::RoiCenter;

/// TIFF compression methods
#[derive(Debug, Clone, Copy, Default)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    #[default]
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, balanced level
    Deflate,
}

/// Writes 8-bit grayscale TIFF previews of frames.
#[derive(Debug, Clone, Copy)]
pub struct TiffFrameWriter {
    pub scale: usize,
    pub compression: TiffCompression,
}

impl Default for TiffFrameWriter {
    fn default() -> Self {
        Self {
            scale: 3,
            compression: TiffCompression::None,
        }
    }
}

impl FrameWriter for TiffFrameWriter {
    fn write_frame(
        &self,
        frame: &Frame,
        overlay: Option<(&[RoiCenter; 4], usize)>,
        output: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let (width, height, pixels) = render_preview(frame, overlay, self.scale);
        debug!("Encoding TIFF preview: {}x{}", width, height);

        let compression = match self.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::Deflate => tiff::encoder::Compression::Deflate(
                tiff::encoder::compression::DeflateLevel::Balanced,
            ),
        };

        let mut buffer = Vec::new();
        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| ExportError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder
            .write_image::<tiff::encoder::colortype::Gray8>(width as u32, height as u32, &pixels)
            .map_err(|e| ExportError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
