//! Analysis result types

use serde::Serialize;

use crate::assay_pipeline::config::Cutoffs;
use crate::assay_pipeline::roi::RoiKind;

/// The four ROI windows after the shared rescale to 0..=255.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Windows in ROI order: internal control, HIV, HBV, HCV
    pub rois: [Vec<u8>; 4],
    /// Smallest raw pixel across all four windows
    pub vmin: u8,
    /// Largest raw pixel across all four windows
    pub vmax: u8,
}

impl Normalized {
    pub fn roi(&self, kind: RoiKind) -> &[u8] {
        &self.rois[kind as usize]
    }

    /// All normalized samples, window after window.
    pub fn flattened(&self) -> Vec<u8> {
        self.rois.concat()
    }
}

/// Target analytes scored against a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Analyte {
    Hiv,
    Hbv,
    Hcv,
}

impl Analyte {
    pub const ALL: [Analyte; 3] = [Analyte::Hiv, Analyte::Hbv, Analyte::Hcv];

    pub fn roi_kind(self) -> RoiKind {
        match self {
            Analyte::Hiv => RoiKind::Hiv,
            Analyte::Hbv => RoiKind::Hbv,
            Analyte::Hcv => RoiKind::Hcv,
        }
    }

    pub fn cutoff(self, cutoffs: &Cutoffs) -> f64 {
        match self {
            Analyte::Hiv => cutoffs.hiv,
            Analyte::Hbv => cutoffs.hbv,
            Analyte::Hcv => cutoffs.hcv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Positive,
    Negative,
}

impl Status {
    /// Positive only when the score is strictly above the cutoff.
    pub fn from_score(score: f64, cutoff: f64) -> Status {
        if score > cutoff {
            Status::Positive
        } else {
            Status::Negative
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Positive => write!(f, "Positive"),
            Status::Negative => write!(f, "Negative"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalyteResult {
    pub status: Status,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Internal control produced signal, so the assay ran
    pub ic_ok: bool,
    pub hiv: AnalyteResult,
    pub hbv: AnalyteResult,
    pub hcv: AnalyteResult,
}

impl ClassificationResult {
    pub fn get(&self, analyte: Analyte) -> &AnalyteResult {
        match analyte {
            Analyte::Hiv => &self.hiv,
            Analyte::Hbv => &self.hbv,
            Analyte::Hcv => &self.hcv,
        }
    }
}
