use tracing::debug;

use crate::assay_pipeline::analysis::types::{Analyte, AnalyteResult, ClassificationResult, Normalized, Status};
use crate::assay_pipeline::config::Cutoffs;
use crate::assay_pipeline::roi::RoiKind;

/// Sum of the window's pixels as fractions of full scale, in `[0, len]`.
pub fn score(roi: &[u8]) -> f64 {
    roi.iter().map(|&p| f64::from(p) / 255.0).sum()
}

/// Scores each analyte window against its cutoff and checks the internal control.
pub fn classify(normalized: &Normalized, cutoffs: &Cutoffs) -> ClassificationResult {
    let ic_ok = normalized
        .roi(RoiKind::InternalControl)
        .iter()
        .any(|&p| p != 0);

    let result_for = |analyte: Analyte| {
        let roi_score = score(normalized.roi(analyte.roi_kind()));
        let cutoff = analyte.cutoff(cutoffs);
        let status = Status::from_score(roi_score, cutoff);
        debug!(?analyte, score = roi_score, cutoff, %status, "Classified analyte");
        AnalyteResult { status, score: roi_score }
    };

    ClassificationResult {
        ic_ok,
        hiv: result_for(Analyte::Hiv),
        hbv: result_for(Analyte::Hbv),
        hcv: result_for(Analyte::Hcv),
    }
}
