use std::sync::{Arc, PoisonError, RwLock};

use crate::assay_pipeline::frame::Frame;

/// Holder of the current frame with last-writer-wins replacement.
///
/// Readers take an `Arc` snapshot, so a frame published mid-extraction never
/// changes the pixels an extraction is working on.
#[derive(Debug, Default)]
pub struct FrameSlot {
    current: RwLock<Option<Arc<Frame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current frame and returns the shared handle to it.
    pub fn publish(&self, frame: Frame) -> Arc<Frame> {
        let frame = Arc::new(frame);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&frame));
        frame
    }

    pub fn snapshot(&self) -> Option<Arc<Frame>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assay_pipeline::frame::FrameOrigin;

    fn flat(value: u8) -> Frame {
        Frame::from_canonical(2, 2, vec![value; 4], FrameOrigin::Dataset).unwrap()
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let slot = FrameSlot::new();
        assert!(slot.snapshot().is_none());

        slot.publish(flat(1));
        let held = slot.snapshot().unwrap();
        slot.publish(flat(2));

        assert_eq!(held.pixels(), &[1; 4]);
        assert_eq!(slot.snapshot().unwrap().pixels(), &[2; 4]);
    }

    #[test]
    fn test_concurrent_readers_see_whole_frames() {
        let slot = Arc::new(FrameSlot::new());
        slot.publish(flat(0));

        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for value in 1..=200u8 {
                    slot.publish(flat(value));
                }
            })
        };

        for _ in 0..200 {
            let frame = slot.snapshot().unwrap();
            let first = frame.pixels()[0];
            assert!(frame.pixels().iter().all(|&p| p == first));
        }
        writer.join().unwrap();
    }
}
