use crate::assay_pipeline::config::FrameGeometry;
use crate::assay_pipeline::frame::orientation::rotate_clockwise;
use crate::assay_pipeline::frame::types::{Frame, FrameOrigin};

impl Frame {
    /// Deterministic synthetic capture for simulation mode.
    ///
    /// A diagonal gradient in the device's streaming order, rotated like a real
    /// capture and tagged [`FrameOrigin::Simulated`].
    pub fn simulated(geometry: &FrameGeometry) -> Frame {
        let (width, height) = (geometry.width, geometry.height);
        let samples: Vec<u8> = (0..height)
            .flat_map(|y| (0..width).map(move |x| ((x * 7 + y * 13) % 256) as u8))
            .collect();
        Frame {
            width: height,
            height: width,
            pixels: rotate_clockwise(&samples, height, width),
            origin: FrameOrigin::Simulated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_frame_is_tagged_and_sized() {
        let geometry = FrameGeometry::default();
        let frame = Frame::simulated(&geometry);
        assert_eq!(frame.origin(), FrameOrigin::Simulated);
        assert_eq!(frame.pixels().len(), geometry.sample_count());
        assert_eq!(frame, Frame::simulated(&geometry));
    }
}
