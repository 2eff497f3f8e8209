use tracing::debug;

use crate::assay_pipeline::analysis::types::Normalized;

/// Rescales all four windows with one linear map taken from their combined
/// min/max, so `vmin` becomes 0 and `vmax` becomes 255.
///
/// Values are rounded half-to-even. When every pixel is equal there is no
/// range to stretch and the output is all zeros.
pub fn normalize(extractions: &[Vec<u8>; 4]) -> Normalized {
    let all = extractions.iter().flatten().copied();
    let vmin = all.clone().min().unwrap_or(0);
    let vmax = all.max().unwrap_or(0);

    let rois = if vmax > vmin {
        let scale = 255.0 / f64::from(vmax - vmin);
        extractions.clone().map(|roi| {
            roi.into_iter()
                .map(|p| (f64::from(p - vmin) * scale).round_ties_even() as u8)
                .collect()
        })
    } else {
        extractions.clone().map(|roi| vec![0u8; roi.len()])
    };

    debug!(vmin, vmax, "Normalized ROI windows");
    Normalized { rois, vmin, vmax }
}
