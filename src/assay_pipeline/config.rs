//! Reader configuration types
//!
//! Everything the pipeline needs from its caller: sensor geometry, ROI size,
//! analyte cutoffs, acquisition timing and the default ROI layout. The config
//! can be built in code through [`ReaderConfigBuilder`] or loaded from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assay_pipeline::common::error::ConfigError;
use crate::assay_pipeline::roi::RoiCenter;

/// Sensor grid and ROI window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameGeometry {
    /// Columns per sensor row as streamed by the device
    pub width: usize,
    /// Rows streamed by the device
    pub height: usize,
    /// Side length of the square ROI window
    pub roi_size: usize,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 160,
            height: 160,
            roi_size: 50,
        }
    }
}

impl FrameGeometry {
    /// Number of samples in one capture (`width * height`).
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions(self.width, self.height));
        }
        // Frames are rotated, so the window has to fit both axes.
        if self.roi_size == 0 || self.roi_size > self.width.min(self.height) {
            return Err(ConfigError::RoiTooLarge {
                roi_size: self.roi_size,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Calibrated score thresholds, one per analyte.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cutoffs {
    pub hiv: f64,
    pub hbv: f64,
    pub hcv: f64,
}

impl Default for Cutoffs {
    fn default() -> Self {
        Self {
            hiv: 97.5,
            hbv: 195.5,
            hcv: 134.7,
        }
    }
}

/// Configuration for acquisition and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub geometry: FrameGeometry,
    pub cutoffs: Cutoffs,
    /// Upper bound for a single read from the byte source
    pub read_timeout_ms: u64,
    /// Wall-clock ceiling for the whole read loop
    pub deadline_ms: u64,
    /// Token written to the device to start streaming
    pub trigger: String,
    /// ROI centers in order: internal control, HIV, HBV, HCV
    pub default_centers: [RoiCenter; 4],
    /// Produce a labelled synthetic frame instead of talking to a device
    pub simulate: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::default(),
            cutoffs: Cutoffs::default(),
            read_timeout_ms: 3_000,
            deadline_ms: 6_000,
            trigger: "99\n".to_string(),
            default_centers: [
                RoiCenter::new(35, 125),
                RoiCenter::new(125, 125),
                RoiCenter::new(35, 35),
                RoiCenter::new(125, 35),
            ],
            simulate: false,
        }
    }
}

impl ReaderConfig {
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::default()
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout { field: "read_timeout_ms" });
        }
        if self.deadline_ms == 0 {
            return Err(ConfigError::ZeroTimeout { field: "deadline_ms" });
        }
        if self.trigger.is_empty() {
            return Err(ConfigError::EmptyTrigger);
        }
        Ok(())
    }

    /// Parses a JSON config; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: ReaderConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading reader config from {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Unreadable(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }
}

/// Builder for ReaderConfig
#[derive(Default)]
pub struct ReaderConfigBuilder {
    geometry: Option<FrameGeometry>,
    cutoffs: Option<Cutoffs>,
    read_timeout: Option<Duration>,
    deadline: Option<Duration>,
    trigger: Option<String>,
    default_centers: Option<[RoiCenter; 4]>,
    simulate: Option<bool>,
}

impl ReaderConfigBuilder {
    pub fn geometry(mut self, geometry: FrameGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn cutoffs(mut self, cutoffs: Cutoffs) -> Self {
        self.cutoffs = Some(cutoffs);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn default_centers(mut self, centers: [RoiCenter; 4]) -> Self {
        self.default_centers = Some(centers);
        self
    }

    pub fn simulate(mut self, enable: bool) -> Self {
        self.simulate = Some(enable);
        self
    }

    pub fn build(self) -> ReaderConfig {
        let default = ReaderConfig::default();
        ReaderConfig {
            geometry: self.geometry.unwrap_or(default.geometry),
            cutoffs: self.cutoffs.unwrap_or(default.cutoffs),
            read_timeout_ms: self
                .read_timeout
                .map(|d| d.as_millis() as u64)
                .unwrap_or(default.read_timeout_ms),
            deadline_ms: self
                .deadline
                .map(|d| d.as_millis() as u64)
                .unwrap_or(default.deadline_ms),
            trigger: self.trigger.unwrap_or(default.trigger),
            default_centers: self.default_centers.unwrap_or(default.default_centers),
            simulate: self.simulate.unwrap_or(default.simulate),
        }
    }
}
