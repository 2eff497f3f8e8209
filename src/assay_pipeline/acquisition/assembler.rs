use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::assay_pipeline::acquisition::decoder::TokenStreamDecoder;
use crate::assay_pipeline::acquisition::source::{ByteSource, ReadOutcome};
use crate::assay_pipeline::common::error::AcquisitionError;
use crate::assay_pipeline::config::{FrameGeometry, ReaderConfig};
use crate::assay_pipeline::frame::{Frame, FrameOrigin};

const READ_CHUNK_BYTES: usize = 4096;

/// Drives one acquisition: trigger the device, collect exactly `width * height`
/// samples before the deadline, and turn them into a canonical [`Frame`].
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    geometry: FrameGeometry,
    trigger: Vec<u8>,
    read_timeout: Duration,
    deadline: Duration,
}

impl FrameAssembler {
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            geometry: config.geometry,
            trigger: config.trigger.as_bytes().to_vec(),
            read_timeout: config.read_timeout(),
            deadline: config.deadline(),
        }
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    /// Acquires a frame. The source is consumed and dropped before returning,
    /// on success and on every failure path.
    pub fn acquire<S: ByteSource>(&self, source: S) -> Result<Frame, AcquisitionError> {
        let samples = self.read_samples(source)?;
        let collected = samples.len();
        Frame::from_sensor_order(samples, self.geometry.width, self.geometry.height, FrameOrigin::Device)
            .map_err(|_| AcquisitionError::Incomplete {
                collected,
                expected: self.geometry.sample_count(),
            })
    }

    /// Runs the trigger/read loop and returns exactly `width * height` samples.
    #[instrument(skip(self, source), fields(expected = self.geometry.sample_count()))]
    pub fn read_samples<S: ByteSource>(&self, mut source: S) -> Result<Vec<u8>, AcquisitionError> {
        let expected = self.geometry.sample_count();
        source.write(&self.trigger)?;
        debug!("Trigger sent ({} bytes)", self.trigger.len());

        let mut decoder = TokenStreamDecoder::new(expected);
        let mut buf = vec![0u8; READ_CHUNK_BYTES];
        let start = Instant::now();
        let mut timeouts = 0usize;

        while !decoder.is_complete() {
            let elapsed = start.elapsed();
            if elapsed > self.deadline {
                warn!(
                    collected = decoder.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Acquisition deadline exceeded"
                );
                break;
            }
            let timeout = self.read_timeout.min(self.deadline - elapsed);

            match source.read(&mut buf, timeout)? {
                ReadOutcome::Data(n) => {
                    decoder.push(&buf[..n]);
                }
                ReadOutcome::TimedOut => {
                    timeouts += 1;
                }
                ReadOutcome::Closed => {
                    decoder.finish();
                    debug!("Source closed after {} samples", decoder.len());
                    break;
                }
            }

            // A zero remaining budget would make the next read return at once.
            if timeout.is_zero() && !decoder.is_complete() {
                break;
            }
        }

        let collected = decoder.len();
        if collected < expected {
            return Err(AcquisitionError::Incomplete { collected, expected });
        }

        info!(
            samples = collected,
            rejected = decoder.rejected(),
            timeouts,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Acquisition complete"
        );
        Ok(decoder.into_samples())
    }
}
