use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::assay_pipeline::{
    acquisition::{ByteSource, FrameAssembler},
    analysis::{classify, normalize},
    common::error::{Result, StateError},
    config::ReaderConfig,
    frame::{self, Frame, FrameOrigin},
    roi::{self, RoiCenter},
    session::{ExtractionReport, FrameSlot, PipelineTimings, Timer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Acquiring,
    FrameReady,
    Extracting,
    ResultReady,
}

/// One reader instance: configuration, the current frame, and the
/// acquisition/extraction cycle around it.
///
/// Operations run to completion one at a time. A failed acquisition or load
/// leaves the previous frame in place.
pub struct ReaderSession {
    config: ReaderConfig,
    assembler: FrameAssembler,
    slot: Arc<FrameSlot>,
    state: SessionState,
}

impl ReaderSession {
    pub fn new(config: ReaderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            assembler: FrameAssembler::new(&config),
            config,
            slot: Arc::new(FrameSlot::new()),
            state: SessionState::Idle,
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_frame(&self) -> Option<Arc<Frame>> {
        self.slot.snapshot()
    }

    /// Shared handle for observers that read the current frame from other threads.
    pub fn frame_slot(&self) -> Arc<FrameSlot> {
        Arc::clone(&self.slot)
    }

    /// Replaces the current frame.
    pub fn publish(&mut self, frame: Frame) -> Arc<Frame> {
        let frame = self.slot.publish(frame);
        self.state = SessionState::FrameReady;
        frame
    }

    fn settle_after_failure(&mut self) {
        self.state = if self.slot.snapshot().is_some() {
            SessionState::FrameReady
        } else {
            SessionState::Idle
        };
    }

    /// Acquires a frame from the device behind `source`. The source is dropped
    /// before this returns.
    pub fn capture<S: ByteSource>(&mut self, source: S) -> Result<Arc<Frame>> {
        self.capture_with_timings(source).map(|(frame, _)| frame)
    }

    #[instrument(skip(self, source))]
    pub fn capture_with_timings<S: ByteSource>(&mut self, source: S) -> Result<(Arc<Frame>, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        self.state = SessionState::Acquiring;
        let geometry = self.assembler.geometry();

        let timer = Timer::start("trigger_and_read");
        let samples = match self.assembler.read_samples(source) {
            Ok(samples) => samples,
            Err(e) => {
                warn!("Capture failed: {}", e);
                self.settle_after_failure();
                return Err(e.into());
            }
        };
        timings.record(timer);

        let timer = Timer::start("assemble_frame");
        let frame = {
            let _span = tracing::info_span!("assemble_frame", width = geometry.width, height = geometry.height).entered();
            Frame::from_sensor_order(samples, geometry.width, geometry.height, FrameOrigin::Device)
        };
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                self.settle_after_failure();
                return Err(e.into());
            }
        };
        timings.record(timer);

        info!(
            total_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Capture complete"
        );
        Ok((self.publish(frame), timings))
    }

    /// Publishes the synthetic frame. Only allowed when the config enables
    /// simulation mode.
    pub fn capture_simulated(&mut self) -> Result<Arc<Frame>> {
        if !self.config.simulate {
            return Err(StateError::SimulationDisabled.into());
        }
        warn!("Simulation mode: publishing a synthetic frame, not a measurement");
        Ok(self.publish(Frame::simulated(&self.config.geometry)))
    }

    #[instrument(skip(self, text))]
    pub fn load_dataset(&mut self, text: &str) -> Result<Arc<Frame>> {
        let frame = frame::load_dataset(text, &self.config.geometry)?;
        info!("Loaded frame from dataset");
        Ok(self.publish(frame))
    }

    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_dataset_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Frame>> {
        let frame = frame::load_dataset_file(path, &self.config.geometry)?;
        info!("Loaded frame from dataset file");
        Ok(self.publish(frame))
    }

    /// Extracts at the configured default centers.
    pub fn extract_default(&mut self) -> Result<ExtractionReport> {
        let centers = self.config.default_centers;
        self.extract(&centers)
    }

    pub fn extract(&mut self, centers: &[RoiCenter]) -> Result<ExtractionReport> {
        self.extract_with_timings(centers).map(|(report, _)| report)
    }

    #[instrument(skip(self, centers), fields(rois = centers.len()))]
    pub fn extract_with_timings(&mut self, centers: &[RoiCenter]) -> Result<(ExtractionReport, PipelineTimings)> {
        if centers.len() != 4 {
            return Err(StateError::WrongRoiCount(centers.len()).into());
        }
        let frame = self.slot.snapshot().ok_or(StateError::NoFrame)?;

        let previous = self.state;
        self.state = SessionState::Extracting;
        match self.run_extraction(&frame, centers) {
            Ok(output) => {
                self.state = SessionState::ResultReady;
                Ok(output)
            }
            Err(e) => {
                self.state = previous;
                Err(e)
            }
        }
    }

    fn run_extraction(&self, frame: &Frame, centers: &[RoiCenter]) -> Result<(ExtractionReport, PipelineTimings)> {
        let mut timings = PipelineTimings::new();
        let roi_size = self.config.geometry.roi_size;

        let timer = Timer::start("extract_rois");
        let clamped = roi::clamped_centers(frame, centers, roi_size)?;
        let windows = roi::extract(frame, &clamped, roi_size)?;
        timings.record(timer);

        let timer = Timer::start("normalize");
        let normalized = normalize(&windows);
        timings.record(timer);

        let timer = Timer::start("classify");
        let classification = classify(&normalized, &self.config.cutoffs);
        timings.record(timer);

        if !classification.ic_ok {
            warn!("Internal control shows no signal; result is invalid");
        }
        info!(
            ic_ok = classification.ic_ok,
            hiv = %classification.hiv.status,
            hbv = %classification.hbv.status,
            hcv = %classification.hcv.status,
            vmin = normalized.vmin,
            vmax = normalized.vmax,
            "Extraction complete"
        );

        let report = ExtractionReport::new(frame.origin(), clamped, normalized, classification);
        Ok((report, timings))
    }
}

impl std::fmt::Debug for ReaderSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderSession")
            .field("state", &self.state)
            .field("has_frame", &self.slot.snapshot().is_some())
            .finish()
    }
}
