use tracing::debug;

use crate::assay_pipeline::common::error::{ConfigError, Result, StateError};
use crate::assay_pipeline::frame::Frame;
use crate::assay_pipeline::roi::types::RoiCenter;

/// Checks the ROI count and clamps every center into the frame.
pub fn clamped_centers(frame: &Frame, centers: &[RoiCenter], roi_size: usize) -> Result<[RoiCenter; 4]> {
    let centers: &[RoiCenter; 4] = centers
        .try_into()
        .map_err(|_| StateError::WrongRoiCount(centers.len()))?;

    if roi_size == 0 || roi_size > frame.width().min(frame.height()) {
        return Err(ConfigError::RoiTooLarge {
            roi_size,
            width: frame.width(),
            height: frame.height(),
        }
        .into());
    }

    Ok((*centers).map(|c| c.clamp_to(frame.width(), frame.height(), roi_size)))
}

/// Copies the four `roi_size x roi_size` windows around `centers`, in the
/// order given, each flattened row-major.
pub fn extract(frame: &Frame, centers: &[RoiCenter], roi_size: usize) -> Result<[Vec<u8>; 4]> {
    let clamped = clamped_centers(frame, centers, roi_size)?;
    Ok(clamped.map(|center| {
        let (x, y) = center.top_left(roi_size);
        debug!(cx = center.cx, cy = center.cy, x, y, "Extracting ROI window");
        frame.window(x, y, roi_size)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assay_pipeline::common::error::ReaderError;
    use crate::assay_pipeline::frame::FrameOrigin;

    fn coordinate_frame(width: usize, height: usize) -> Frame {
        // Pixel value encodes its position so windows can be checked exactly.
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| ((y * 16 + x) % 256) as u8))
            .collect();
        Frame::from_canonical(width, height, pixels, FrameOrigin::Dataset).unwrap()
    }

    #[test]
    fn test_windows_in_order() {
        let frame = coordinate_frame(16, 16);
        let centers = [
            RoiCenter::new(2, 2),
            RoiCenter::new(5, 2),
            RoiCenter::new(2, 5),
            RoiCenter::new(5, 5),
        ];
        let windows = extract(&frame, &centers, 2).unwrap();

        assert_eq!(windows[0], vec![17, 18, 33, 34]);
        assert_eq!(windows[1], vec![20, 21, 36, 37]);
        assert_eq!(windows[2], vec![65, 66, 81, 82]);
        assert_eq!(windows[3], vec![68, 69, 84, 85]);
    }

    #[test]
    fn test_out_of_range_centers_use_nearest_valid() {
        let frame = coordinate_frame(16, 16);
        let far = [
            RoiCenter::new(-50, -50),
            RoiCenter::new(500, -3),
            RoiCenter::new(-1, 16),
            RoiCenter::new(i64::MAX, i64::MIN),
        ];
        let windows = extract(&frame, &far, 4).unwrap();
        let clamped = clamped_centers(&frame, &far, 4).unwrap();

        assert_eq!(clamped[0], RoiCenter::new(2, 2));
        assert_eq!(clamped[1], RoiCenter::new(14, 2));
        assert_eq!(clamped[2], RoiCenter::new(2, 14));
        assert_eq!(clamped[3], RoiCenter::new(14, 2));

        let expected = extract(&frame, &clamped, 4).unwrap();
        assert_eq!(windows, expected);
        for window in &windows {
            assert_eq!(window.len(), 16);
        }
        // Bottom-right corner window ends on the last pixel.
        assert_eq!(*windows[2].last().unwrap(), frame.get(3, 15).unwrap());
    }

    #[test]
    fn test_wrong_roi_count_rejected() {
        let frame = coordinate_frame(16, 16);
        for count in [0usize, 3, 5] {
            let centers = vec![RoiCenter::new(8, 8); count];
            match extract(&frame, &centers, 4) {
                Err(ReaderError::State(StateError::WrongRoiCount(n))) => assert_eq!(n, count),
                other => panic!("unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn test_roi_larger_than_frame_rejected() {
        let frame = coordinate_frame(8, 8);
        let centers = [RoiCenter::new(4, 4); 4];
        assert!(matches!(
            extract(&frame, &centers, 9),
            Err(ReaderError::Config(ConfigError::RoiTooLarge { .. }))
        ));
    }
}
