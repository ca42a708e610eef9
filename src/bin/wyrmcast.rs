use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use wyrmcast::{
    AnimatedImageSource, CanvasSize, FrameSource, RECEIVER_DATAGRAM_DELAY, ResizeFilter,
    StillImageSource, StreamConfig, StreamDriver, StreamLimits, VideoSource,
};

#[derive(Parser, Debug)]
#[command(name = "wyrmcast", version, about = "Stream pictures and video to an LED panel wall")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a still image.
    Image(ImageArgs),
    /// Loop an animated image (GIF) forever.
    Gif(GifArgs),
    /// Play a video file at its own frame rate (requires `ffmpeg` on PATH).
    Video(VideoArgs),
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Image to show.
    path: PathBuf,

    /// Send a single frame and exit instead of refreshing the image.
    #[arg(long)]
    once: bool,

    /// Seconds between refreshes.
    #[arg(long)]
    frame_time: Option<f64>,

    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args, Debug)]
struct GifArgs {
    /// Animation to loop.
    path: PathBuf,

    /// Seconds per frame; defaults to the delays stored in the file.
    #[arg(long)]
    frame_time: Option<f64>,

    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args, Debug)]
struct VideoArgs {
    /// Video to play.
    path: PathBuf,

    /// Seconds per frame; defaults to the video's frame rate.
    #[arg(long)]
    frame_time: Option<f64>,

    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// JSON stream configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Receiver IP address.
    #[arg(long)]
    target: Option<IpAddr>,

    /// Receiver UDP port.
    #[arg(long)]
    port: Option<u16>,

    /// Canvas size in pixels (64 or 128).
    #[arg(long, value_parser = ["64", "128"])]
    size: Option<String>,

    /// Panel-select mask for a 64 canvas (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_mask)]
    select: Option<u8>,

    /// Board connector per segment, e.g. `4,3,2,1`.
    #[arg(long, value_delimiter = ',')]
    connectors: Option<Vec<u8>>,

    /// Pause after each datagram, in microseconds (0 disables).
    #[arg(long)]
    datagram_delay_us: Option<u64>,

    /// Resampling filter used for letterboxing.
    #[arg(long, value_enum)]
    filter: Option<FilterChoice>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<FilterChoice> for ResizeFilter {
    fn from(choice: FilterChoice) -> Self {
        match choice {
            FilterChoice::Nearest => ResizeFilter::Nearest,
            FilterChoice::Triangle => ResizeFilter::Triangle,
            FilterChoice::CatmullRom => ResizeFilter::CatmullRom,
            FilterChoice::Gaussian => ResizeFilter::Gaussian,
            FilterChoice::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

fn parse_mask(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse::<u8>(),
    };
    match parsed {
        Ok(0) => Err("panel select mask must be non-zero".to_string()),
        Ok(mask) => Ok(mask),
        Err(e) => Err(format!("invalid panel select mask '{s}': {e}")),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Image(args) => cmd_image(args),
        Command::Gif(args) => cmd_gif(args),
        Command::Video(args) => cmd_video(args),
    }
}

fn build_config(target: &TargetArgs, frame_time: Option<f64>) -> anyhow::Result<StreamConfig> {
    let mut cfg = match &target.config {
        Some(path) => StreamConfig::from_json_file(path)?,
        None => StreamConfig::default(),
    };

    if let Some(ip) = target.target {
        cfg.target = ip;
    }
    if let Some(port) = target.port {
        cfg.port = port;
    }
    if let Some(size) = &target.size {
        let side: u32 = size.parse().context("parse --size")?;
        cfg.canvas = CanvasSize::from_side(side)?;
    }
    if let Some(mask) = target.select {
        cfg.panel_select = mask;
    }
    if let Some(connectors) = &target.connectors {
        cfg.connectors = Some(connectors.clone());
    }
    if let Some(us) = target.datagram_delay_us {
        cfg.datagram_delay_us = Some(us);
    }
    if let Some(filter) = target.filter {
        cfg.filter = filter.into();
    }
    if frame_time.is_some() {
        cfg.frame_time_sec = frame_time;
    }

    cfg.validate().context("invalid stream configuration")?;
    Ok(cfg)
}

fn stream(
    cfg: &StreamConfig,
    source: &mut dyn FrameSource,
    limits: StreamLimits,
    label: &Path,
) -> anyhow::Result<()> {
    let mut driver = StreamDriver::connect(cfg)
        .with_context(|| format!("open transport to {}", cfg.target_addr()))?;

    tracing::info!(
        source = %label.display(),
        target = %cfg.target_addr(),
        canvas = cfg.canvas.side(),
        "streaming"
    );
    let stats = driver.run(source, limits)?;

    eprintln!(
        "sent {} frames ({} datagrams) to {}; skipped {}, late {}, send failures {}",
        stats.frames_sent,
        stats.datagrams_sent,
        cfg.target_addr(),
        stats.frames_skipped,
        stats.late_frames,
        stats.send_failures
    );
    Ok(())
}

fn cmd_image(args: ImageArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.target, args.frame_time)?;
    let mut source = StillImageSource::open(&args.path)
        .with_context(|| format!("open image '{}'", args.path.display()))?;

    let limits = StreamLimits {
        max_frames: if args.once { Some(1) } else { args.target.frames },
    };
    stream(&cfg, &mut source, limits, &args.path)
}

fn cmd_gif(args: GifArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args.target, args.frame_time)?;
    let mut source = AnimatedImageSource::open(&args.path)
        .with_context(|| format!("open animation '{}'", args.path.display()))?;

    let limits = StreamLimits {
        max_frames: args.target.frames,
    };
    stream(&cfg, &mut source, limits, &args.path)
}

fn cmd_video(args: VideoArgs) -> anyhow::Result<()> {
    let mut cfg = build_config(&args.target, args.frame_time)?;
    if cfg.datagram_delay_us.is_none() {
        cfg.datagram_delay_us = Some(RECEIVER_DATAGRAM_DELAY.as_micros() as u64);
    }

    let mut source = VideoSource::open(&args.path)
        .with_context(|| format!("open video '{}'", args.path.display()))?;

    let limits = StreamLimits {
        max_frames: args.target.frames,
    };
    stream(&cfg, &mut source, limits, &args.path)
}
