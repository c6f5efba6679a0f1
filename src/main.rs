// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "camera-snapshot")]
#[command(about = "Negotiate a camera stream and capture still snapshots")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/camera-snapshot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show this image through the virtual camera instead of the test pattern
    #[arg(long, global = true)]
    image: Option<PathBuf>,

    /// Simulated camera latency in milliseconds
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available video inputs
    List,

    /// List the resolution presets
    Presets,

    /// Negotiate a stream and print what the device delivered
    Probe {
        #[command(flatten)]
        capture: CaptureArgs,
    },

    /// Take a snapshot
    Snapshot {
        #[command(flatten)]
        capture: CaptureArgs,

        /// Output MIME type (image/png, image/jpeg, image/webp)
        #[arg(short, long)]
        format: Option<String>,

        /// Encoder quality between 0 and 1
        #[arg(short, long)]
        quality: Option<f32>,

        /// Rasterize at the frame size or at the requested resolution
        #[arg(long, value_enum, default_value_t = RasterArg::Native)]
        raster: RasterArg,

        /// Output file or directory (default: ./IMG_TIMESTAMP.ext)
        #[arg(short, long, conflicts_with = "data_uri")]
        output: Option<PathBuf>,

        /// Print a data URI instead of writing a file
        #[arg(long)]
        data_uri: bool,
    },
}

#[derive(Args)]
struct CaptureArgs {
    /// Ideal resolution: a preset name ("HD 720p") or WIDTHxHEIGHT
    #[arg(short, long)]
    resolution: Option<String>,

    /// Ideal frame rate
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Facing mode: user, environment, left or right
    #[arg(long)]
    facing: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RasterArg {
    Native,
    Requested,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camera_snapshot=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut config = camera_snapshot::Config::load_or_default(cli.config.as_deref())?;
    if let Some(image) = cli.image {
        config.image_source = Some(image);
    }
    if let Some(latency_ms) = cli.latency_ms {
        config.latency_ms = latency_ms;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::List => runtime.block_on(cli::list_cameras(&config)),
        Commands::Presets => cli::list_presets(),
        Commands::Probe { capture } => {
            cli::apply_capture_args(&mut config, &capture.into())?;
            runtime.block_on(cli::probe(&config))
        }
        Commands::Snapshot {
            capture,
            format,
            quality,
            raster,
            output,
            data_uri,
        } => {
            cli::apply_capture_args(&mut config, &capture.into())?;
            if let Some(format) = format {
                config.output.mime_type = format;
            }
            if let Some(quality) = quality {
                config.output.quality = quality;
            }
            let requested_raster = matches!(raster, RasterArg::Requested);
            let target = if data_uri {
                cli::SnapshotTarget::DataUri
            } else {
                cli::SnapshotTarget::File(output)
            };
            runtime.block_on(cli::take_snapshot(&config, requested_raster, target))
        }
    }
}

impl From<CaptureArgs> for cli::CaptureOverrides {
    fn from(args: CaptureArgs) -> Self {
        Self {
            resolution: args.resolution,
            frame_rate: args.frame_rate,
            facing: args.facing,
        }
    }
}
