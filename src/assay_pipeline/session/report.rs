use serde::Serialize;

use crate::assay_pipeline::analysis::{ClassificationResult, Normalized};
use crate::assay_pipeline::frame::FrameOrigin;
use crate::assay_pipeline::roi::RoiCenter;

/// Everything one extraction produced. Persisting, rendering or transmitting it
/// is up to the caller.
///
/// Serializes as `{origin, centers, ic_ok, hiv, hbv, hcv, vmin, vmax}`; the
/// normalized samples are left out of JSON and exported as CSV instead.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub origin: FrameOrigin,
    /// Centers after clamping, in ROI order
    pub centers: [RoiCenter; 4],
    #[serde(flatten)]
    pub classification: ClassificationResult,
    pub vmin: u8,
    pub vmax: u8,
    /// `4 * roi_size^2` normalized samples, window after window
    #[serde(skip)]
    pub normalized: Vec<u8>,
}

impl ExtractionReport {
    pub fn new(
        origin: FrameOrigin,
        centers: [RoiCenter; 4],
        normalized: Normalized,
        classification: ClassificationResult,
    ) -> Self {
        Self {
            origin,
            centers,
            classification,
            vmin: normalized.vmin,
            vmax: normalized.vmax,
            normalized: normalized.flattened(),
        }
    }

    pub fn ic_ok(&self) -> bool {
        self.classification.ic_ok
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
