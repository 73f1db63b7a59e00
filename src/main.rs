use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorquant::codec::EncodeOptions;
use colorquant::models::{AppConfig, ImageType};
use colorquant::services::{
    output_file_name, resolve_output_dir, BatchRunner, BatchSettings, Job, ProgressTicker,
};
use colorquant_core::{KernelTable, QuantizeOptions};

#[derive(Parser)]
#[command(name = "colorquant")]
#[command(about = "Reduce images to a fixed palette with error-diffusion dithering")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// YAML config file (default: $COLORQUANT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered diffusion kernels
    Kernels,
}

#[derive(Args)]
struct RunArgs {
    /// Input images (PNG or JPEG)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory [default: output]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Dithering method [default: FloydSteinberg]
    #[arg(short, long)]
    ditherer: Option<String>,

    /// Image type [default: jpg]
    #[arg(short = 't', long = "type", value_enum)]
    image_type: Option<ImageType>,

    /// Use the quantizer without dithering
    #[arg(long)]
    no_dither: bool,

    /// JPEG quality, 1-100 [default: 100]
    #[arg(short, long)]
    compression: Option<u8>,

    /// Number of palette colors [default: 256]
    #[arg(short, long = "palette")]
    palette_size: Option<usize>,

    /// Scan odd rows right-to-left
    #[arg(long)]
    serpentine: bool,

    /// Palette as comma-separated hex colors (e.g. "#000000,#FFFFFF,#FF0000")
    #[arg(long, value_delimiter = ',')]
    colors: Option<Vec<String>>,

    /// Re-compress PNG output with oxipng
    #[arg(long)]
    optimize: bool,

    /// Images processed concurrently [default: available parallelism]
    #[arg(short, long)]
    workers: Option<usize>,
}

impl RunArgs {
    /// CLI flags win over config values
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(ditherer) = &self.ditherer {
            config.ditherer = ditherer.clone();
        }
        if let Some(image_type) = self.image_type {
            config.image_type = image_type;
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
        if let Some(palette_size) = self.palette_size {
            config.palette_size = palette_size;
        }
        if self.serpentine {
            config.serpentine = true;
        }
        if let Some(colors) = &self.colors {
            config.colors = Some(colors.clone());
        }
        if self.optimize {
            config.optimize_png = true;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorquant=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command {
        Some(Commands::Kernels) => {
            let kernels = config.kernel_table()?;
            run_kernels_command(&kernels);
            Ok(())
        }
        None => {
            cli.run.apply_to(&mut config);
            config.validate()?;
            run_quantize_command(&cli.run, &config).await
        }
    }
}

/// Print every registered kernel with its shape and propagation
fn run_kernels_command(kernels: &KernelTable) {
    for kernel in kernels.iter() {
        println!(
            "{:<16} {}x{}  propagation {:.3}",
            kernel.name(),
            kernel.rows(),
            kernel.cols(),
            kernel.propagation()
        );
    }
}

async fn run_quantize_command(args: &RunArgs, config: &AppConfig) -> anyhow::Result<()> {
    let kernels = Arc::new(config.kernel_table()?);
    let dither = !args.no_dither;

    // Resolve the kernel before touching any file
    if dither {
        kernels.lookup(&config.ditherer).with_context(|| {
            format!(
                "Invalid dithering method! Available: {}",
                kernels.names().collect::<Vec<_>>().join(", ")
            )
        })?;
    }

    let palette = config.palette()?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let ext = config.image_type.extension();
    let prefix_stem = args.inputs.len() > 1;
    let kernel_name = dither.then_some(config.ditherer.as_str());

    let jobs: Vec<Job> = args
        .inputs
        .iter()
        .map(|input| {
            let dir = resolve_output_dir(&cwd, input, &config.output);
            let name = output_file_name(input, kernel_name, ext, prefix_stem);
            Job {
                input: input.clone(),
                output: dir.join(name),
            }
        })
        .collect();

    let settings = BatchSettings {
        palette,
        quantize: QuantizeOptions::new()
            .num_colors(config.palette_size)
            .dither(dither)
            .kernel(config.ditherer.as_str())
            .serpentine(config.serpentine),
        encode: EncodeOptions {
            image_type: config.image_type,
            quality: config.compression,
            optimize: config.optimize_png,
        },
    };
    let runner = BatchRunner::new(kernels, settings, config.worker_count());
    let interrupt = runner.cancel_on(tokio::signal::ctrl_c());

    print!("Rendering image...");
    std::io::stdout().flush()?;
    let start = Instant::now();
    let ticker = ProgressTicker::stdout();

    let outcomes = runner.run(jobs).await;
    interrupt.abort();

    ticker.stop().await;
    println!("\nDone✓");
    println!("Rendered in: {:.2}s", start.elapsed().as_secs_f64());

    let total = outcomes.len();
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("{}", outcome.job.output.display()),
            Err(e) => {
                failed += 1;
                eprintln!("{}: {e}", outcome.job.input.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} images failed");
    }
    Ok(())
}
