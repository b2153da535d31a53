use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stickerforge::{JobOptions, Studio, StudioConfig, scan_background_dir};

#[derive(Parser, Debug)]
#[command(name = "stickerforge", version, about = "Render text-and-emoji chat stickers")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a still PNG sticker.
    Image(CommonArgs),
    /// Render an animated MP4 (requires `ffmpeg`).
    Video(AnimatedArgs),
    /// Render a looping animated WebP sticker (requires `ffmpeg` with libwebp).
    Sticker(AnimatedArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Text to render; emoji are drawn as bitmaps.
    #[arg(long)]
    text: String,

    /// JSON config file; unset keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory (overrides the config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Directory of background images added to the pool.
    #[arg(long)]
    bg_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnimatedArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Clip length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Cancel the job after this many seconds.
    #[arg(long)]
    timeout_secs: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let out = match cli.cmd {
        Command::Image(args) => {
            let studio = make_studio(&args)?;
            studio.image_sticker(&args.text)?
        }
        Command::Video(args) => {
            let studio = make_studio(&args.common)?;
            studio.video(&args.common.text, job_options(&args)?)?
        }
        Command::Sticker(args) => {
            let studio = make_studio(&args.common)?;
            studio.animated_sticker(&args.common.text, job_options(&args)?)?
        }
    };
    println!("{}", out.display());
    Ok(())
}

fn make_studio(args: &CommonArgs) -> anyhow::Result<Studio> {
    let mut cfg = match &args.config {
        Some(path) => StudioConfig::from_path(path)?,
        None => StudioConfig::default(),
    };
    if let Some(dir) = &args.out_dir {
        cfg.out_dir = dir.clone();
    }
    if let Some(dir) = &args.bg_dir {
        let found = scan_background_dir(dir)?;
        tracing::debug!(dir = %dir.display(), count = found.len(), "scanned backgrounds");
        cfg.background_pool
            .extend(found.iter().map(|p| p.to_string_lossy().into_owned()));
    }
    Ok(Studio::new(cfg)?)
}

fn job_options(args: &AnimatedArgs) -> anyhow::Result<JobOptions> {
    let opts = JobOptions {
        duration_secs: args.duration,
        fps: args.fps,
        deadline: None,
    };
    match args.timeout_secs {
        Some(secs) => {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|e| anyhow::anyhow!("invalid --timeout-secs {secs}: {e}"))?;
            Ok(opts.with_timeout(timeout))
        }
        None => Ok(opts),
    }
}
