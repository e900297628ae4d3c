use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use flypath::{
    AnimationSettings, Compositor, DeliveryFormat, ExportJob, ExportOptions, ExportSession,
    ExportState, ExporterConfig, FfmpegTranscoder, FixedStepClock, Fps, FrameClock, Gazetteer,
    Geocoder, HeadlessMap, LineStyle, MapStyle, Resolution, Rgba8, RouteAnimator, RouteDocument,
    SettingsStore,
};

#[derive(Parser, Debug)]
#[command(name = "flypath", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one composited frame of the animation as a PNG.
    Frame(FrameArgs),
    /// Record the full animation and export it as MP4/GIF (requires `ffmpeg`, see FLYPATH_FFMPEG).
    Export(ExportArgs),
    /// Print a share link for a route document.
    Share(ShareArgs),
    /// Decode a share link into a route document JSON.
    Open(OpenArgs),
    /// Search the built-in city table.
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
struct SettingsOverrides {
    /// Playback speed multiplier.
    #[arg(long)]
    speed: Option<f64>,
    /// Pause at each destination, in seconds.
    #[arg(long)]
    pause: Option<f64>,
    /// Zoom while stopped at a destination.
    #[arg(long)]
    stop_zoom: Option<f64>,
    /// Route line style: solid, dashed or dotted.
    #[arg(long)]
    line_style: Option<LineStyle>,
    /// Route colour as `#RRGGBB`.
    #[arg(long)]
    route_color: Option<String>,
    /// Show or hide destination labels.
    #[arg(long)]
    labels: Option<bool>,
    /// Map style: dark, satellite, light, outdoors or vintage.
    #[arg(long)]
    map_style: Option<MapStyle>,
}

impl SettingsOverrides {
    fn apply(&self, mut s: AnimationSettings) -> anyhow::Result<AnimationSettings> {
        if let Some(v) = self.speed {
            s.speed = v;
        }
        if let Some(v) = self.pause {
            s.pause_duration = v;
        }
        if let Some(v) = self.stop_zoom {
            s.stop_zoom = v;
        }
        if let Some(v) = self.line_style {
            s.line_style = v;
        }
        if let Some(v) = &self.route_color {
            s.route_color = Rgba8::from_hex(v)?;
        }
        if let Some(v) = self.labels {
            s.show_labels = v;
        }
        if let Some(v) = self.map_style {
            s.map_style = v;
        }
        s.validate()?;
        Ok(s)
    }
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input route document JSON (`{destinations, settings}`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Time since the start of the run, in milliseconds.
    #[arg(long, default_value_t = 0)]
    at_ms: u64,

    /// Output resolution: 720p or 1080p.
    #[arg(long, default_value = "720p")]
    resolution: Resolution,

    /// Omit the watermark.
    #[arg(long, default_value_t = false)]
    no_watermark: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    settings: SettingsOverrides,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input route document JSON (`{destinations, settings}`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Output file name without extension.
    #[arg(long, default_value = "travel-animation")]
    name: String,

    /// Delivery format: mp4 or gif.
    #[arg(long, default_value = "mp4")]
    format: DeliveryFormat,

    /// Output resolution: 720p or 1080p.
    #[arg(long, default_value = "720p")]
    resolution: Resolution,

    /// Capture frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Omit the watermark.
    #[arg(long, default_value_t = false)]
    no_watermark: bool,

    #[command(flatten)]
    settings: SettingsOverrides,
}

#[derive(Parser, Debug)]
struct ShareArgs {
    /// Input route document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Base URL of the app.
    #[arg(long, default_value = "https://flypath.app/")]
    base: String,

    #[command(flatten)]
    settings: SettingsOverrides,
}

#[derive(Parser, Debug)]
struct OpenArgs {
    /// Share link or bare token.
    link: String,

    /// Write the document here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// City name prefix.
    query: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
        Command::Share(args) => cmd_share(args),
        Command::Open(args) => cmd_open(args),
        Command::Search(args) => cmd_search(args),
    }
}

fn load_document(path: &Path, overrides: &SettingsOverrides) -> anyhow::Result<RouteDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read route document '{}'", path.display()))?;
    let mut doc = RouteDocument::from_json(&text)
        .with_context(|| format!("parse route document '{}'", path.display()))?;
    doc.settings = overrides.apply(doc.settings)?;
    Ok(doc)
}

fn animator_for(
    doc: &RouteDocument,
    resolution: Resolution,
) -> anyhow::Result<RouteAnimator<HeadlessMap>> {
    let store = SettingsStore::new(doc.settings)?;
    let mut animator = RouteAnimator::new(HeadlessMap::new(resolution.canvas()), store);
    animator.set_destinations(doc.destinations.clone());
    Ok(animator)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path, &args.settings)?;
    let mut animator = animator_for(&doc, args.resolution)?;

    let mut clock = FixedStepClock::new(Fps::new(30, 1)?);
    let target = Duration::from_millis(args.at_ms);
    if args.at_ms > 0 && animator.start(clock.now()) {
        while clock.now() < target && animator.is_running() {
            clock.next_frame();
            animator.tick(clock.now())?;
        }
    }

    let mut compositor = Compositor::new(args.resolution, !args.no_watermark);
    compositor.start();
    let settings = animator.settings().get();
    let indicator = animator.indicator_position();
    let destinations = animator.destinations().clone();
    let frame = compositor
        .compose(animator.view_mut(), &destinations, indicator, &settings)?
        .context("compositor produced no frame")?;
    compositor.stop();

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
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path, &args.settings)?;
    if doc.destinations.len() < 2 {
        anyhow::bail!("export needs at least two destinations");
    }
    let mut animator = animator_for(&doc, args.resolution)?;

    let config = ExporterConfig {
        out_dir: args.out_dir,
        file_stem: args.name,
        fps: Fps::new(args.fps, 1)?,
        ..ExporterConfig::default()
    };
    let options = ExportOptions {
        resolution: args.resolution,
        format: args.format,
        watermark: !args.no_watermark,
    };
    let mut session = ExportSession::new(config, options, Box::new(FfmpegTranscoder::from_env()));
    let job = ExportJob::new();
    let done = AtomicBool::new(false);

    let result = std::thread::scope(|scope| {
        scope.spawn(|| report_progress(&job, &done));
        let r = session.run(&mut animator, &job);
        done.store(true, Ordering::Release);
        r
    });

    let artifact = result?.context("animation could not start")?;
    if artifact.fell_back {
        eprintln!(
            "ffmpeg unavailable; delivered {} instead of {}",
            artifact.format.extension(),
            args.format.extension()
        );
    }
    eprintln!(
        "wrote {} ({}x{}, {} frames)",
        artifact.path.display(),
        artifact.width,
        artifact.height,
        artifact.frames
    );
    Ok(())
}

fn report_progress(job: &ExportJob, done: &AtomicBool) {
    let mut last = None;
    while !done.load(Ordering::Acquire) {
        let status = job.status();
        let shown = (status.state, (status.progress * 100.0).round() as u32);
        if last != Some(shown) {
            match status.state {
                ExportState::Recording => eprintln!("recording..."),
                ExportState::Encoding => eprintln!("encoding {}%", shown.1),
                _ => {}
            }
            last = Some(shown);
        }
        std::thread::sleep(Duration::from_millis(200));
    }
}

fn cmd_share(args: ShareArgs) -> anyhow::Result<()> {
    let doc = load_document(&args.in_path, &args.settings)?;
    let url = flypath::share_url(&args.base, &doc)?;
    println!("{url}");
    Ok(())
}

fn cmd_open(args: OpenArgs) -> anyhow::Result<()> {
    let doc = match url::Url::parse(&args.link) {
        Ok(url) => flypath::document_from_url(&url),
        Err(_) => flypath::decode_token(&args.link),
    }
    .context("link does not carry a valid route")?;

    let json = doc.to_json_pretty()?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("write route document '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_search(args: SearchArgs) -> anyhow::Result<()> {
    for hit in Gazetteer::builtin().search(&args.query) {
        println!("{}\t{}\t{:.4}\t{:.4}", hit.name, hit.country, hit.lng, hit.lat);
    }
    Ok(())
}
