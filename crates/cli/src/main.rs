//! cropsuit CLI - sweet-corn land suitability

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cropsuit_core::io::read_geotiff;
use cropsuit_core::Raster;
use cropsuit_suitability::prelude::*;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "cropsuit")]
#[command(author, version, about = "Sweet-corn land suitability from climate normals and soil pH", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: load, evaluate, combine, export
    Run {
        /// Raster store holding the climate and soil datasets
        #[arg(short, long, default_value = "data")]
        data: PathBuf,
        /// Export directory (created if missing)
        #[arg(short, long, default_value = "exports")]
        out: PathBuf,
        /// JSON file overriding dataset ids and export parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Also write a white-to-green RGBA quicklook
        #[arg(long)]
        quicklook: bool,
        /// Print the stages without reading any data
        #[arg(long)]
        dry_run: bool,
    },
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Print crop thresholds and the effective configuration as JSON
    Params {
        /// JSON file overriding dataset ids and export parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = PipelineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            debug!("Config: {}", path.display());
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster: Raster<f64> =
        read_geotiff(path).with_context(|| format!("Failed to read raster {}", path.display()))?;
    pb.finish_and_clear();
    info!("Input: {} x {}", raster.cols(), raster.rows());
    Ok(raster)
}

fn print_plan(pipeline: &SuitabilityPipeline, data: &Path, out: &Path) {
    println!("Raster store: {}", data.display());
    println!("Destination:  {}", out.display());
    println!("\nStages:");
    for (i, stage) in pipeline.plan().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, stage);
    }
}

fn run(
    data: PathBuf,
    out: PathBuf,
    config: Option<PathBuf>,
    quicklook: bool,
    dry_run: bool,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let pipeline = SuitabilityPipeline::new(config, CropThresholds::SWEET_CORN);

    if dry_run {
        print_plan(&pipeline, &data, &out);
        return Ok(());
    }

    std::fs::create_dir_all(&out)
        .with_context(|| format!("Failed to create export directory {}", out.display()))?;

    let start = Instant::now();
    let source = DirectorySource::new(&data);
    let destination = DirectoryDestination::new(&out).with_quicklook(quicklook);

    let pb = spinner("Computing suitability...");
    let report = pipeline.run(&source, &destination);
    pb.finish_and_clear();
    let report = report.context("Suitability pipeline failed")?;
    let elapsed = start.elapsed();

    let summary = report.summary;
    println!("Suitability saved to: {}", report.raster_path.display());
    println!("  Metadata: {}", report.metadata_path.display());
    if let Some(path) = &report.quicklook_path {
        println!("  Quicklook: {}", path.display());
    }
    println!(
        "  Grid: {} x {} ({})",
        report.cols,
        report.rows,
        pipeline.config().export.crs
    );
    println!(
        "  Suitable cells: {} of {} valid ({:.1}%), {} no-data",
        summary.suitable,
        summary.suitable + summary.unsuitable,
        summary.suitable_percent(),
        summary.nodata
    );
    println!("  Processing time: {:.2?}", elapsed);
    Ok(())
}

fn info_command(input: &Path) -> Result<()> {
    let raster = read_raster(input)?;
    let (rows, cols) = raster.shape();
    let bounds = raster.bounds();
    let stats = raster.statistics();

    println!("File: {}", input.display());
    println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
    println!("Cell size: {}", raster.cell_size());
    println!(
        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.0, bounds.1, bounds.2, bounds.3
    );
    if let Some(crs) = raster.crs() {
        println!("CRS: {}", crs);
    }
    if let Some(nodata) = raster.nodata() {
        println!("NoData: {}", nodata);
    }
    println!("\nStatistics:");
    if let Some(min) = stats.min {
        println!("  Min: {:.4}", min);
    }
    if let Some(max) = stats.max {
        println!("  Max: {:.4}", max);
    }
    if let Some(mean) = stats.mean {
        println!("  Mean: {:.4}", mean);
    }
    let share = if raster.is_empty() {
        0.0
    } else {
        100.0 * stats.valid_count as f64 / raster.len() as f64
    };
    println!("  Valid cells: {} ({:.1}%)", stats.valid_count, share);
    Ok(())
}

fn params_command(config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let params = serde_json::json!({
        "thresholds": CropThresholds::SWEET_CORN,
        "config": config,
    });
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Run {
            data,
            out,
            config,
            quicklook,
            dry_run,
        } => run(data, out, config, quicklook, dry_run),
        Commands::Info { input } => info_command(&input),
        Commands::Params { config } => params_command(config.as_deref()),
    }
}
