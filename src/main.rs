use anyhow::{bail, Context};
use clap::Parser;
use env_logger::Env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use plateread::recognition::{normalize, open_image};
use plateread::{Pipeline, PipelineContext, RecognitionConfig, RecognizedPlate};

#[derive(Parser)]
#[command(name = "plateread")]
#[command(about = "Read license plate numbers from vehicle photos")]
struct Cli {
    /// Paths to input image files
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Plate region detector model (.rten)
    #[arg(long, value_name = "MODEL")]
    detector: PathBuf,

    /// Character classifier model (.rten)
    #[arg(long, value_name = "MODEL")]
    classifier: PathBuf,

    /// JSON file overriding recognition parameters
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save debug outputs to directory (must be empty, single image only)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Do not scale tall images down before recognition
    #[arg(long)]
    no_normalize: bool,

    /// Print one JSON object per image
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_filter = if args.verbose { "info,plateread=debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if args.debug_out.is_some() && args.images.len() > 1 {
        bail!("--debug-out can only be used with a single image");
    }

    let config = match &args.config {
        Some(path) => RecognitionConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecognitionConfig::default(),
    };

    // Models are loaded once and shared read-only by every worker
    let context = Arc::new(
        PipelineContext::from_model_files(&args.detector, &args.classifier, config)
            .context("Failed to load models")?,
    );

    let mut tasks = Vec::with_capacity(args.images.len());
    for path in &args.images {
        let image_path = path.clone();
        let context = context.clone();
        let debug_out = args.debug_out.clone();
        let normalize_input = !args.no_normalize;

        let task = tokio::task::spawn_blocking(move || {
            recognize_file(&image_path, context, debug_out, normalize_input)
        });
        tasks.push((path.clone(), task));
    }

    let total = tasks.len();
    let mut failures = 0;
    for (path, task) in tasks {
        match task.await? {
            Ok(plate) => print_result(&path, &plate, args.json)?,
            Err(e) => {
                failures += 1;
                log::error!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} images could not be processed", failures, total);
    }

    Ok(())
}

fn recognize_file(
    path: &Path,
    context: Arc<PipelineContext>,
    debug_out: Option<PathBuf>,
    normalize_input: bool,
) -> anyhow::Result<RecognizedPlate> {
    let img = open_image(path).with_context(|| format!("Failed to load image {}", path.display()))?;
    log::debug!("Image loaded: {}x{}", img.width(), img.height());

    let img = if normalize_input {
        normalize(img, context.config().target_height)?
    } else {
        img
    };

    let mut pipeline = Pipeline::new(context);
    if let Some(dir) = debug_out {
        pipeline = pipeline.with_debug(dir)?;
    }

    Ok(pipeline.recognize(&img)?)
}

fn print_result(path: &Path, plate: &RecognizedPlate, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "image": path.display().to_string(),
            "plate": plate.text,
            "glyphs": plate.glyph_count,
            "region": plate.plate.as_ref().map(|p| p.region),
        });
        println!("{}", serde_json::to_string(&value)?);
    } else if plate.is_empty() {
        println!("{}: <no plate recognized>", path.display());
    } else {
        println!("{}: {}", path.display(), plate.text);
    }
    Ok(())
}
