use std::time::Duration;

use crate::assay_pipeline::acquisition::{ByteSource, ReadOutcome, ScriptedSource};
use crate::assay_pipeline::analysis::Status;
use crate::assay_pipeline::common::error::{AcquisitionError, ReaderError, StateError};
use crate::assay_pipeline::config::{FrameGeometry, ReaderConfig};
use crate::assay_pipeline::frame::{Frame, FrameOrigin};
use crate::assay_pipeline::roi::RoiCenter;
use crate::assay_pipeline::session::{ReaderSession, SessionState};

const SIDE: usize = 160;

/// Canonical-orientation frame with a background and four filled ROI windows
/// at the default centers.
fn assay_frame(background: u8, ic: u8, hiv: u8, hbv: u8, hcv: u8) -> Frame {
    let mut pixels = vec![background; SIDE * SIDE];
    // Top-left corners of the default windows.
    for ((x0, y0), value) in [((10, 100), ic), ((100, 100), hiv), ((10, 10), hbv), ((100, 10), hcv)] {
        for y in y0..y0 + 50 {
            for x in x0..x0 + 50 {
                pixels[y * SIDE + x] = value;
            }
        }
    }
    Frame::from_canonical(SIDE, SIDE, pixels, FrameOrigin::Dataset).unwrap()
}

fn sensor_samples() -> Vec<u8> {
    (0..SIDE * SIDE).map(|i| ((i * 31 + i / SIDE) % 256) as u8).collect()
}

fn fast_config() -> ReaderConfig {
    ReaderConfig::builder()
        .read_timeout(Duration::from_millis(5))
        .deadline(Duration::from_millis(30))
        .build()
}

/// Source that records whether it was dropped.
struct TrackedSource {
    inner: ScriptedSource,
    dropped: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl ByteSource for TrackedSource {
    fn write(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.inner.write(bytes)
    }

    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> std::io::Result<ReadOutcome> {
        self.inner.read(buf, timeout)
    }
}

impl Drop for TrackedSource {
    fn drop(&mut self) {
        self.dropped.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[test]
fn test_end_to_end_default_centers() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    session.publish(assay_frame(50, 200, 0, 255, 100));

    let report = session.extract_default().unwrap();

    assert_eq!((report.vmin, report.vmax), (0, 255));
    assert!(report.ic_ok());
    assert_eq!(report.classification.hiv.score, 0.0);
    assert_eq!(report.classification.hiv.status, Status::Negative);
    assert_eq!(report.classification.hbv.score, 2500.0);
    assert_eq!(report.classification.hbv.status, Status::Positive);
    assert!((report.classification.hcv.score - 2500.0 * 100.0 / 255.0).abs() < 1e-6);
    assert!((report.classification.hcv.score - 980.39).abs() < 0.01);
    assert_eq!(report.classification.hcv.status, Status::Positive);
    assert_eq!(report.normalized.len(), 4 * 2500);
    assert_eq!(session.state(), SessionState::ResultReady);
}

#[test]
fn test_flat_frame_invalidates_control() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    session.publish(assay_frame(120, 120, 120, 120, 120));

    let report = session.extract_default().unwrap();

    assert_eq!((report.vmin, report.vmax), (120, 120));
    assert!(report.normalized.iter().all(|&p| p == 0));
    assert!(!report.ic_ok());
    assert_eq!(report.classification.hbv.status, Status::Negative);
}

#[test]
fn test_extract_before_frame_is_rejected() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    let err = session.extract_default().unwrap_err();
    assert!(matches!(err, ReaderError::State(StateError::NoFrame)));
    assert_eq!(session.state(), SessionState::Idle);
}

#[test]
fn test_wrong_roi_count_checked_first() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    let err = session.extract(&[RoiCenter::new(80, 80); 3]).unwrap_err();
    assert!(matches!(err, ReaderError::State(StateError::WrongRoiCount(3))));
}

#[test]
fn test_report_carries_clamped_centers() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    session.publish(assay_frame(0, 10, 20, 30, 40));

    let centers = [
        RoiCenter::new(-5, 400),
        RoiCenter::new(125, 125),
        RoiCenter::new(35, 35),
        RoiCenter::new(200, 0),
    ];
    let report = session.extract(&centers).unwrap();
    assert_eq!(report.centers[0], RoiCenter::new(25, 135));
    assert_eq!(report.centers[3], RoiCenter::new(135, 25));
}

#[test]
fn test_capture_matches_dataset_load() {
    let samples = sensor_samples();
    let stream: String = samples.iter().map(|v| format!("{},", v)).collect();
    let dataset: String = samples
        .chunks(SIDE)
        .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","))
        .collect::<Vec<_>>()
        .join("\n");

    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    let mut source = ScriptedSource::from_bytes(stream.as_bytes(), 997);
    let captured = session.capture(&mut source).unwrap();
    assert_eq!(source.written(), b"99\n");
    assert_eq!(captured.origin(), FrameOrigin::Device);
    assert_eq!(session.state(), SessionState::FrameReady);

    let loaded = session.load_dataset(&dataset).unwrap();
    assert_eq!(loaded.origin(), FrameOrigin::Dataset);
    assert_eq!(captured.pixels(), loaded.pixels());
    assert_eq!((captured.width(), captured.height()), (loaded.width(), loaded.height()));
}

#[test]
fn test_capture_timings_recorded() {
    let stream: String = sensor_samples().iter().map(|v| format!("{} ", v)).collect();
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();

    let (_, timings) = session
        .capture_with_timings(ScriptedSource::from_bytes(stream.as_bytes(), 4096))
        .unwrap();
    assert!(timings.get_step("trigger_and_read").is_some());
    assert!(timings.get_step("assemble_frame").is_some());

    let (_, timings) = session.extract_with_timings(&[RoiCenter::new(80, 80); 4]).unwrap();
    for step in ["extract_rois", "normalize", "classify"] {
        assert!(timings.get_step(step).is_some(), "missing {step}");
    }
}

#[test]
fn test_failed_capture_keeps_previous_frame() {
    let mut session = ReaderSession::new(fast_config()).unwrap();
    let previous = session.publish(assay_frame(1, 2, 3, 4, 5));

    let dropped = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let source = TrackedSource {
        inner: ScriptedSource::new().chunk(b"1,2,3,".to_vec()),
        dropped: dropped.clone(),
    };
    let err = session.capture(source).unwrap_err();

    match err {
        ReaderError::Acquisition(AcquisitionError::Incomplete { collected, expected }) => {
            assert_eq!(collected, 3);
            assert_eq!(expected, SIDE * SIDE);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(dropped.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(session.state(), SessionState::FrameReady);
    assert_eq!(session.current_frame().unwrap().pixels(), previous.pixels());
}

#[test]
fn test_failed_capture_without_frame_stays_idle() {
    let mut session = ReaderSession::new(fast_config()).unwrap();
    let source = ScriptedSource::new().fail(std::io::ErrorKind::ConnectionRefused);

    let err = session.capture(source).unwrap_err();
    assert!(matches!(err, ReaderError::Acquisition(AcquisitionError::Transport(_))));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.current_frame().is_none());
}

#[test]
fn test_bad_dataset_keeps_previous_frame() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    session.publish(assay_frame(9, 9, 9, 9, 9));

    assert!(session.load_dataset("1,2,3").is_err());
    assert_eq!(session.current_frame().unwrap().pixels()[0], 9);
}

#[test]
fn test_simulation_requires_explicit_switch() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    assert!(matches!(
        session.capture_simulated(),
        Err(ReaderError::State(StateError::SimulationDisabled))
    ));

    let config = ReaderConfig::builder().simulate(true).build();
    let mut session = ReaderSession::new(config).unwrap();
    let frame = session.capture_simulated().unwrap();
    assert_eq!(frame.origin(), FrameOrigin::Simulated);
    assert_eq!(session.extract_default().unwrap().origin, FrameOrigin::Simulated);
}

#[test]
fn test_invalid_config_rejected() {
    let config = ReaderConfig::builder()
        .geometry(FrameGeometry { width: 30, height: 30, roi_size: 50 })
        .build();
    assert!(matches!(ReaderSession::new(config), Err(ReaderError::Config(_))));

    let config = ReaderConfig::builder().read_timeout(Duration::ZERO).build();
    assert!(matches!(ReaderSession::new(config), Err(ReaderError::Config(_))));
}

#[test]
fn test_report_json_shape() {
    let mut session = ReaderSession::new(ReaderConfig::default()).unwrap();
    session.publish(assay_frame(50, 200, 0, 255, 100));
    let report = session.extract_default().unwrap();

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["ic_ok"], true);
    assert_eq!(value["hiv"]["status"], "Negative");
    assert_eq!(value["hbv"]["status"], "Positive");
    assert_eq!(value["hbv"]["score"], 2500.0);
    assert_eq!(value["vmin"], 0);
    assert_eq!(value["vmax"], 255);
    assert_eq!(value["origin"], "dataset");
    assert!(value.get("normalized").is_none());
}
