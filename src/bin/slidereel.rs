use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use slidereel::{
    EffectRegistry, FfmpegSink, FfmpegSinkOpts, FrameSize, RenderOpts, SlideshowCompositor,
    SlideshowConfig, UnknownEffectPolicy,
};

#[derive(Parser, Debug)]
#[command(name = "slidereel", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a slideshow to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame of one image's slot as a PNG.
    Preview(PreviewArgs),
    /// List the registered effect names.
    Effects,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Input images in display order. Replaces the config file's list when given.
    images: Vec<PathBuf>,

    /// JSON slideshow config; flags given on the command line override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output frames per second [default: 30].
    #[arg(long)]
    fps: Option<u32>,

    /// Total duration in seconds [default: 10].
    #[arg(long)]
    duration: Option<f64>,

    /// Explicit output size as WxH; derived from the images when omitted.
    #[arg(long)]
    size: Option<FrameSize>,

    /// Effect chain for one image, e.g. `--effect photo.jpg=zoom,vignette`. Repeatable.
    #[arg(long = "effect", value_parser = parse_effect_arg)]
    effects: Vec<(PathBuf, Vec<String>)>,

    /// Pin one image's duration in seconds, e.g. `--hold photo.jpg=2.5`. Repeatable.
    #[arg(long = "hold", value_parser = parse_hold_arg)]
    holds: Vec<(PathBuf, f64)>,

    /// What to do with unregistered effect names: `fail` or `passthrough`.
    #[arg(long)]
    unknown_effects: Option<UnknownEffectPolicy>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    show: ShowArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// Compute frames in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per parallel batch (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    show: ShowArgs,

    /// Image slot (0-based position in the image list).
    #[arg(long, default_value_t = 0)]
    slot: usize,

    /// Frame within the slot (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Effects => cmd_effects(),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = build_config(args.show)?;
    let opts = RenderOpts {
        parallel: args.parallel,
        threads: args.threads,
        chunk_size: args.chunk_size,
    };
    let mut compositor = SlideshowCompositor::new(config, opts);

    let sink_opts = FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: !args.no_overwrite,
    };
    let mut sink = FfmpegSink::new(sink_opts);
    let report = compositor.render(&mut sink)?;

    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "wrote {} ({} frames, {}, {:.2}s)",
        args.out.display(),
        report.frames_written,
        report.frame_size,
        report.duration_secs()
    );
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let config = build_config(args.show)?;
    let mut compositor = SlideshowCompositor::new(config, RenderOpts::default());
    let frame = compositor.preview_frame(args.slot, args.frame)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_effects() -> anyhow::Result<()> {
    for name in EffectRegistry::builtin().names() {
        println!("{name}");
    }
    Ok(())
}

fn build_config(args: ShowArgs) -> anyhow::Result<SlideshowConfig> {
    let mut config = match &args.config {
        Some(path) => SlideshowConfig::from_path(path)?,
        None => SlideshowConfig::default(),
    };
    if !args.images.is_empty() {
        config.images = args.images;
    }
    if let Some(fps) = args.fps {
        config.fps = fps;
    }
    if let Some(secs) = args.duration {
        config.duration_secs = secs;
    }
    if let Some(size) = args.size {
        config.frame_size = Some(size);
    }
    if let Some(policy) = args.unknown_effects {
        config.unknown_effects = policy;
    }
    for (image, names) in args.effects {
        config.effects.insert(image, names);
    }
    for (image, secs) in args.holds {
        config.durations.insert(image, secs);
    }
    if config.images.is_empty() {
        anyhow::bail!("no input images: pass image paths or a --config with an `images` list");
    }
    Ok(config)
}

fn parse_effect_arg(s: &str) -> Result<(PathBuf, Vec<String>), String> {
    let (image, names) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected IMAGE=effect[,effect..], got '{s}'"))?;
    if image.is_empty() {
        return Err(format!("missing image path in '{s}'"));
    }
    let names = names
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .collect();
    Ok((PathBuf::from(image), names))
}

fn parse_hold_arg(s: &str) -> Result<(PathBuf, f64), String> {
    let (image, secs) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected IMAGE=SECONDS, got '{s}'"))?;
    if image.is_empty() {
        return Err(format!("missing image path in '{s}'"));
    }
    let secs = secs
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid seconds in '{s}': {e}"))?;
    Ok((PathBuf::from(image), secs))
}
