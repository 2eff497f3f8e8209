use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use assay_reader::assay_pipeline::{
    Analyte, ExtractionReport, FrameWriter, ReaderConfig, ReaderSession, RoiCenter, RoiKind, TcpSource,
    TiffFrameWriter,
    timestamped_csv_path, write_dataset_csv, write_normalized_csv,
};
use assay_reader::logger;

#[derive(Parser)]
#[command(name = "assay-reader")]
#[command(about = "Capture frames from a multiplex assay reader and score its four test regions")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger one capture and save the frame.
    Capture(CaptureArgs),

    /// Load or capture a frame, then extract, normalize and classify the ROIs.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Args)]
struct CommonArgs {
    /// Reader config (JSON). Built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Produce a synthetic frame instead of talking to a device.
    #[arg(long)]
    simulate: bool,

    /// TCP connect timeout in milliseconds.
    #[arg(long, default_value = "2000")]
    connect_timeout_ms: u64,

    /// Write a grayscale TIFF preview of the frame here.
    #[arg(long)]
    frame_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CaptureArgs {
    /// Address of the device bridge, e.g. 192.168.4.1:5000.
    #[arg(long, required_unless_present = "simulate")]
    addr: Option<String>,

    /// Save the raw frame as a dataset CSV, one sensor row per line.
    #[arg(long)]
    dataset_out: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Debug, Clone, Args)]
struct ExtractArgs {
    /// Dataset CSV to load instead of capturing.
    #[arg(long, conflicts_with = "addr")]
    dataset: Option<PathBuf>,

    /// Address of the device bridge to capture from.
    #[arg(long)]
    addr: Option<String>,

    /// ROI centers in order internal, HIV, HBV, HCV. Config defaults otherwise.
    #[arg(long = "roi", value_name = "CX,CY", num_args = 4, allow_hyphen_values = true)]
    rois: Vec<RoiCenter>,

    /// Shift every ROI center by DX,DY before extraction, e.g. for a strip
    /// seated off-center. Centers still clamp at the frame edges.
    #[arg(long, value_name = "DX,DY", value_parser = parse_shift, allow_hyphen_values = true)]
    shift: Option<(i64, i64)>,

    /// Root directory for timestamped normalized-sample CSVs.
    #[arg(long, default_value = "roi_extract")]
    out_dir: PathBuf,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    common: CommonArgs,
}

fn parse_shift(s: &str) -> Result<(i64, i64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got {s:?}"))?;
    let dx = dx.trim().parse().map_err(|e| format!("bad dx {dx:?}: {e}"))?;
    let dy = dy.trim().parse().map_err(|e| format!("bad dy {dy:?}: {e}"))?;
    Ok((dx, dy))
}

fn load_config(common: &CommonArgs) -> anyhow::Result<ReaderConfig> {
    let mut config = match &common.config {
        Some(path) => ReaderConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReaderConfig::default(),
    };
    if common.simulate {
        config.simulate = true;
    }
    Ok(config)
}

/// Fills the session's frame from whichever input the flags select.
fn acquire(
    session: &mut ReaderSession,
    common: &CommonArgs,
    dataset: Option<&Path>,
    addr: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(path) = dataset {
        session.load_dataset_file(path)?;
    } else if let Some(addr) = addr {
        let source = TcpSource::connect(addr, Duration::from_millis(common.connect_timeout_ms))
            .with_context(|| format!("connecting to {addr}"))?;
        let (_, timings) = session.capture_with_timings(source)?;
        timings.log_summary();
    } else if session.config().simulate {
        session.capture_simulated()?;
    } else {
        bail!("no frame source: pass --dataset, --addr or --simulate");
    }
    Ok(())
}

fn create_file(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn write_preview(
    session: &ReaderSession,
    path: &Path,
    overlay: Option<&[RoiCenter; 4]>,
) -> anyhow::Result<()> {
    let frame = session.current_frame().context("no frame to preview")?;
    let roi_size = session.config().geometry.roi_size;
    let mut out = create_file(path)?;
    TiffFrameWriter::default().write_frame(&frame, overlay.map(|c| (c, roi_size)), &mut out)?;
    info!("Frame preview written to {}", path.display());
    Ok(())
}

fn run_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let mut session = ReaderSession::new(load_config(&args.common)?)?;
    acquire(&mut session, &args.common, None, args.addr.as_deref())?;
    let frame = session.current_frame().context("capture produced no frame")?;
    info!(
        "Captured {}x{} frame ({:?})",
        frame.width(),
        frame.height(),
        frame.origin()
    );

    if let Some(path) = &args.dataset_out {
        let mut out = create_file(path)?;
        write_dataset_csv(&frame, &mut out)?;
        info!("Dataset written to {}", path.display());
    }
    if let Some(path) = &args.common.frame_out {
        write_preview(&session, path, None)?;
    }
    Ok(())
}

fn print_report(report: &ExtractionReport) {
    println!("Frame origin: {:?}", report.origin);
    for (kind, center) in RoiKind::ALL.iter().zip(&report.centers) {
        println!("{} ROI center: {}", kind.label(), center);
    }
    println!(
        "{} control: {}",
        RoiKind::InternalControl.label(),
        if report.ic_ok() { "valid" } else { "INVALID" }
    );
    for analyte in Analyte::ALL {
        let result = report.classification.get(analyte);
        println!(
            "{}: {} (score {:.2})",
            analyte.roi_kind().label(),
            result.status,
            result.score
        );
    }
    println!("Normalization range: {}..={}", report.vmin, report.vmax);
}

fn run_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let mut session = ReaderSession::new(load_config(&args.common)?)?;
    acquire(
        &mut session,
        &args.common,
        args.dataset.as_deref(),
        args.addr.as_deref(),
    )?;

    let mut centers = if args.rois.is_empty() {
        session.config().default_centers.to_vec()
    } else {
        args.rois.clone()
    };
    if let Some((dx, dy)) = args.shift {
        let frame = session.current_frame().context("no frame to extract from")?;
        let roi_size = session.config().geometry.roi_size;
        for center in &mut centers {
            *center = center.nudge(dx, dy, frame.width(), frame.height(), roi_size);
        }
    }
    let (report, timings) = session.extract_with_timings(&centers)?;
    timings.log_summary();

    let csv_path = timestamped_csv_path(&args.out_dir, chrono::Local::now().naive_local());
    let mut out = create_file(&csv_path)?;
    write_normalized_csv(&report.normalized, &mut out)?;
    info!("Normalized samples written to {}", csv_path.display());

    if let Some(path) = &args.common.frame_out {
        write_preview(&session, path, Some(&report.centers))?;
    }

    if !report.ic_ok() {
        warn!("Internal control failed; treat analyte results as invalid");
    }
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logger::init_with_default("debug");
    } else {
        logger::init();
    }

    match cli.command {
        Commands::Capture(args) => run_capture(args),
        Commands::Extract(args) => run_extract(args),
    }
}
