use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::assay_pipeline::common::error::ExportError;
use crate::assay_pipeline::frame::Frame;

fn write_row(values: &[u8], output: &mut dyn Write) -> Result<(), ExportError> {
    let mut line = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    output.write_all(line.as_bytes())?;
    Ok(())
}

/// Writes the frame as a dataset in the device's streaming order, one sensor
/// row per line. The output loads back into an identical frame.
pub fn write_dataset_csv(frame: &Frame, output: &mut dyn Write) -> Result<(), ExportError> {
    let samples = frame.sensor_order();
    // A sensor row holds `height` canonical pixels.
    for row in samples.chunks(frame.height()) {
        write_row(row, output)?;
    }
    Ok(())
}

/// Writes all normalized ROI samples as a single comma-separated row.
pub fn write_normalized_csv(normalized: &[u8], output: &mut dyn Write) -> Result<(), ExportError> {
    write_row(normalized, output)
}

/// `root/MM-DD-YYYY/HH-MM-SS_ROI.csv`
pub fn timestamped_csv_path(root: &Path, now: NaiveDateTime) -> PathBuf {
    root.join(now.format("%m-%d-%Y").to_string())
        .join(format!("{}_ROI.csv", now.format("%H-%M-%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assay_pipeline::config::FrameGeometry;
    use crate::assay_pipeline::frame::{FrameOrigin, load_dataset};
    use chrono::NaiveDate;

    #[test]
    fn test_dataset_csv_loads_back() {
        let samples: Vec<u8> = (0..12).map(|i| i * 20).collect();
        let frame = Frame::from_sensor_order(samples, 4, 3, FrameOrigin::Device).unwrap();

        let mut out = Vec::new();
        write_dataset_csv(&frame, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("0,20,40,60"));
        assert_eq!(text.lines().count(), 3);

        let geometry = FrameGeometry { width: 4, height: 3, roi_size: 1 };
        let loaded = load_dataset(&text, &geometry).unwrap();
        assert_eq!(loaded.pixels(), frame.pixels());
    }

    #[test]
    fn test_normalized_csv_is_one_row() {
        let mut out = Vec::new();
        write_normalized_csv(&[0, 128, 255], &mut out).unwrap();
        assert_eq!(out, b"0,128,255\n");
    }

    #[test]
    fn test_timestamped_path_layout() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 42)
            .unwrap();
        let path = timestamped_csv_path(Path::new("roi_extract"), now);
        assert_eq!(path, Path::new("roi_extract/03-07-2026/09-05-42_ROI.csv"));
    }
}
