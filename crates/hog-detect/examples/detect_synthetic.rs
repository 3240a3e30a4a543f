use hog_detect::detect;
use hog_detect::descriptor::{DescriptorDataset, HogDescriptor};
use hog_detect::{LinearClassifier, MultiScaleDetector, MultiScaleParams};
use image::{GrayImage, Luma};

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

/// Dark frame with a bright square of side `side` at `(x0, y0)`.
fn scene(width: u32, height: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inside = (x0..x0 + side).contains(&x) && (y0..y0 + side).contains(&y);
        Luma([if inside { 210 } else { 40 }])
    })
}

fn init_logging() {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = hog_detect::core::init_with_level(log::LevelFilter::Info);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let params = MultiScaleParams {
        window: [32, 32],
        stride: [8, 8],
        canonical_size: [32, 32],
        scale_factor: 1.25,
        threshold: 0.6,
        ..Default::default()
    };

    // One positive template: a centred square. The linear model scores windows
    // by their correlation with its descriptor.
    let hog = HogDescriptor::new(params.hog)?;
    let mut dataset = DescriptorDataset::new(hog, params.canonical_size);
    let template = detect::luma_from_gray(&scene(32, 32, 4, 4, 24))?;
    dataset.push_image(&template.view(), true)?;
    let rows = dataset.into_inner();
    let weights = rows.features[0].clone();
    let norm2: f32 = weights.iter().map(|w| w * w).sum();
    let model = LinearClassifier::new(weights, -0.8 * norm2).with_platt(-8.0 / norm2.max(1e-6), 0.0);

    let detector = MultiScaleDetector::new(params, model)?;
    let img = scene(160, 120, 60, 30, 48);
    let rects = detect::detect_objects(&img, &detector)?;

    println!("{} object(s)", rects.len());
    for r in rects {
        println!("  x={} y={} w={} h={}", r.x, r.y, r.width, r.height);
    }
    Ok(())
}
