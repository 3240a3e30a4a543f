use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use hog_detect::descriptor::{DatasetError, DescriptorDataset, HogDescriptor, HogParams};
use hog_detect::detect::{self, DetectError};
use hog_detect::detector::{DetectorError, LinearClassifier, ModelError, MultiScaleDetector};
use hog_detect::{Detection, MultiScaleParams, Rect};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "hog-detect", version, about = "HOG sliding-window object detection")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append labelled HOG descriptors of sample images to a dataset file.
    Features(FeaturesArgs),
    /// Run the multi-scale detector on an image and print JSON.
    Detect(DetectArgs),
}

#[derive(Args, Debug)]
struct FeaturesArgs {
    /// Sample label: 1 for positives, 0 for negatives.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=1))]
    label: u8,
    /// Canonical sample size as HEIGHT WIDTH.
    #[arg(long, num_args = 2, value_names = ["H", "W"], required = true)]
    size: Vec<usize>,
    /// HOG parameters as JSON (defaults when omitted).
    #[arg(long)]
    params: Option<PathBuf>,
    /// Dataset file; rows are appended.
    #[arg(long)]
    out: PathBuf,
    /// Sample images.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct DetectArgs {
    /// Linear classifier JSON.
    #[arg(long)]
    model: PathBuf,
    /// Detector parameters as JSON (defaults when omitted).
    #[arg(long)]
    params: Option<PathBuf>,
    /// Print unfiltered window detections instead of grouped rectangles.
    #[arg(long)]
    raw: bool,
    image: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid JSON: {source}")]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("--size needs positive HEIGHT and WIDTH (got {0:?})")]
    InvalidSize(Vec<usize>),
    #[error(transparent)]
    Hog(#[from] hog_detect::descriptor::HogParamsError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct RawReport<'a> {
    image: &'a Path,
    width: usize,
    height: usize,
    detections: Vec<Detection>,
}

#[derive(Serialize)]
struct GroupedReport<'a> {
    image: &'a Path,
    width: usize,
    height: usize,
    rects: Vec<Rect>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    #[cfg(feature = "tracing")]
    {
        let _ = verbose;
        hog_detect::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let level = match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        let _ = hog_detect::core::init_with_level(level);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Features(args) => run_features(args),
        Command::Detect(args) => run_detect(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

fn run_features(args: FeaturesArgs) -> Result<(), CliError> {
    let canonical = match args.size.as_slice() {
        &[h, w] if h > 0 && w > 0 => [h, w],
        _ => return Err(CliError::InvalidSize(args.size.clone())),
    };
    let params: HogParams = match &args.params {
        Some(path) => read_json(path)?,
        None => HogParams::default(),
    };
    let hog = HogDescriptor::new(params)?;
    let mut dataset = DescriptorDataset::new(hog, canonical);
    if dataset.feature_len() == 0 {
        log::warn!(
            "sample size {}x{} is smaller than one HOG block",
            canonical[0],
            canonical[1]
        );
    }

    for path in &args.images {
        let luma = detect::load_luma(path)?;
        dataset.push_image(&luma.view(), args.label == 1)?;
        log::debug!("described {}", path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.out)
        .map_err(|source| CliError::Io {
            path: args.out.clone(),
            source,
        })?;
    let count = dataset.len();
    dataset.into_inner().write_text(BufWriter::new(file))?;

    println!(
        "appended {count} samples with label {} to {}",
        args.label,
        args.out.display()
    );
    Ok(())
}

fn run_detect(args: DetectArgs) -> Result<(), CliError> {
    let params: MultiScaleParams = match &args.params {
        Some(path) => read_json(path)?,
        None => MultiScaleParams::default(),
    };
    let model = LinearClassifier::load(&args.model)?;
    let detector = MultiScaleDetector::new(params, model)?;

    let luma = detect::load_luma(&args.image)?;
    let (width, height) = (luma.width(), luma.height());
    let raw = detector.detect_multi_scale(&luma.view());
    log::info!("{} raw detections", raw.len());

    let json = if args.raw {
        serde_json::to_string_pretty(&RawReport {
            image: &args.image,
            width,
            height,
            detections: raw,
        })?
    } else {
        let rects = hog_detect::aggregate::aggregate(&raw, &detector.params().aggregation);
        serde_json::to_string_pretty(&GroupedReport {
            image: &args.image,
            width,
            height,
            rects,
        })?
    };
    println!("{json}");
    Ok(())
}
