//! Cutline CLI: inspect, preview, and export a single clip.
//!
//! Usage:
//!   cutline info <FILE>                      Show duration and frame size
//!   cutline thumbnails <FILE>                Render the thumbnail strip to PNG
//!   cutline timeline <FILE>                  Render the timeline (strip, trim, playhead) to PNG
//!   cutline trim <FILE> --start --end        Export a trimmed copy
//!   cutline crop <FILE> --x --y --width --height
//!                                            Export a cropped copy
//!   cutline filter <FILE> [--blur 3 ...]     Export a filtered copy
//!   cutline replay <FILE> <SCRIPT> [--render-dir DIR]
//!                                            Apply an editor event script, print the result,
//!                                            optionally render timeline and crop overlay PNGs
//!   cutline config [--init]                  Print the effective config, or write it to disk

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cutline",
    about = "Trim, crop, and filter a video clip",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where exports go and whether to run them at all.
#[derive(Args, Debug, Clone)]
pub struct ExportTarget {
    /// Output directory (file name is chosen from the edit)
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Print the transcode command without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Filter slider values. Unset sliders stay neutral.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub brightness: Option<f64>,
    #[arg(long)]
    pub contrast: Option<f64>,
    #[arg(long)]
    pub saturation: Option<f64>,
    #[arg(long)]
    pub blur: Option<f64>,
    #[arg(long)]
    pub sepia: Option<f64>,
    #[arg(long)]
    pub grayscale: Option<f64>,
    #[arg(long)]
    pub invert: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub hue: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show clip duration and frame size
    Info {
        /// Path to the video file
        path: PathBuf,
    },

    /// Render the thumbnail strip to a PNG
    Thumbnails {
        /// Path to the video file
        path: PathBuf,

        /// Output PNG path
        #[arg(short, long, default_value = "strip.png")]
        output: PathBuf,
    },

    /// Render the timeline strip with trim window and playhead to a PNG
    Timeline {
        /// Path to the video file
        path: PathBuf,

        /// Trim start (seconds); defaults to the clip start
        #[arg(long)]
        start: Option<f64>,

        /// Trim end (seconds); defaults to the clip end
        #[arg(long)]
        end: Option<f64>,

        /// Playhead position (seconds)
        #[arg(long, default_value = "0")]
        at: f64,

        /// Canvas width
        #[arg(long, default_value = "800")]
        width: u32,

        /// Canvas height
        #[arg(long, default_value = "80")]
        height: u32,

        /// Output PNG path
        #[arg(short, long, default_value = "timeline.png")]
        output: PathBuf,
    },

    /// Export the `[start, end]` window without re-encoding
    Trim {
        /// Path to the video file
        path: PathBuf,

        /// Trim start (seconds)
        #[arg(long)]
        start: f64,

        /// Trim end (seconds)
        #[arg(long)]
        end: f64,

        #[command(flatten)]
        target: ExportTarget,
    },

    /// Export a cropped copy (coordinates in source pixels)
    Crop {
        /// Path to the video file
        path: PathBuf,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        y: f64,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        #[command(flatten)]
        target: ExportTarget,
    },

    /// Export a filtered copy
    Filter {
        /// Path to the video file
        path: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        target: ExportTarget,
    },

    /// Apply an editor event script (JSONL) and print the resulting state
    Replay {
        /// Path to the video file
        path: PathBuf,

        /// Path to the event script
        script: PathBuf,

        /// Print the player commands emitted by each event
        #[arg(long)]
        trace_commands: bool,

        /// Also write timeline.png and crop.png (crop overlay over the
        /// frame at the playhead) for the final state into this directory
        #[arg(long)]
        render_dir: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the config file location instead
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = cutline_common::config::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    cutline_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Info { path } => commands::info::run(&config, path).await,
        Commands::Thumbnails { path, output } => {
            commands::thumbnails::run(&config, path, output).await
        }
        Commands::Timeline {
            path,
            start,
            end,
            at,
            width,
            height,
            output,
        } => {
            commands::timeline::run(&config, path, start, end, at, width, height, output).await
        }
        Commands::Trim {
            path,
            start,
            end,
            target,
        } => commands::trim::run(&config, path, start, end, target).await,
        Commands::Crop {
            path,
            x,
            y,
            width,
            height,
            target,
        } => commands::crop::run(&config, path, x, y, width, height, target).await,
        Commands::Filter {
            path,
            filters,
            target,
        } => commands::filter::run(&config, path, filters, target).await,
        Commands::Replay {
            path,
            script,
            trace_commands,
            render_dir,
        } => commands::replay::run(&config, path, script, trace_commands, render_dir).await,
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
