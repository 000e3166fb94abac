use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use kinetype::{EffectId, Fps, PointerScript, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "kinetype", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the gallery pages.
    List(ListArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a session as an MP4 (`.mp4`, requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Render one frame of every page into a contact sheet PNG.
    Sheet(SheetArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Print the catalog as JSON.
    #[arg(long)]
    json: bool,
}

/// Flags shared by every rendering command. They override `--config`.
#[derive(Args, Debug, Clone, Default)]
struct SessionArgs {
    /// Session config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Output frames per second (integer).
    #[arg(long)]
    fps: Option<u32>,

    /// Number of output frames.
    #[arg(long)]
    frames: Option<u64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Page id (see `kinetype list`).
    #[arg(long)]
    page: Option<EffectId>,

    /// Extra directory to search for font files.
    #[arg(long)]
    font_dir: Option<PathBuf>,

    #[arg(long)]
    serif: Option<PathBuf>,

    #[arg(long)]
    sans: Option<PathBuf>,

    #[arg(long)]
    mono: Option<PathBuf>,

    /// Pointer script JSON.
    #[arg(long)]
    pointer: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output `.mp4` file, or a directory for `frame_00000.png`...
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Args, Debug)]
struct SheetArgs {
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 5)]
    columns: usize,

    /// Frame to capture for every page (default: the last frame).
    #[arg(long)]
    frame: Option<u64>,

    /// Rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Comma-separated page ids (default: every page).
    #[arg(long, value_delimiter = ',')]
    pages: Vec<EffectId>,

    #[command(flatten)]
    session: SessionArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Sheet(args) => cmd_sheet(args),
    }
}

fn load_config(args: &SessionArgs) -> anyhow::Result<SessionConfig> {
    let mut cfg = match &args.config {
        Some(path) => SessionConfig::from_path(path)?,
        None => SessionConfig::default(),
    };
    if let Some(w) = args.width {
        cfg.width = w;
    }
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(fps) = args.fps {
        cfg.fps = Fps::new(fps, 1)?;
    }
    if let Some(frames) = args.frames {
        cfg.frames = frames;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(page) = args.page {
        cfg.page = page;
    }
    if args.font_dir.is_some() {
        cfg.fonts.dir = args.font_dir.clone();
    }
    if args.serif.is_some() {
        cfg.fonts.serif = args.serif.clone();
    }
    if args.sans.is_some() {
        cfg.fonts.sans = args.sans.clone();
    }
    if args.mono.is_some() {
        cfg.fonts.mono = args.mono.clone();
    }
    if let Some(path) = &args.pointer {
        cfg.pointer = Some(read_pointer_script(path)?);
    }
    cfg.validate()?;
    Ok(cfg)
}

fn read_pointer_script(path: &Path) -> anyhow::Result<PointerScript> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open pointer script '{}'", path.display()))?;
    let script: PointerScript = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse pointer script '{}'", path.display()))?;
    script.validate()?;
    Ok(script)
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let pages = kinetype::catalog();
    if args.json {
        println!("{}", serde_json::to_string_pretty(pages)?);
        return Ok(());
    }
    for p in pages {
        println!("{:<10} {:<11} {}", p.id.as_str(), p.label, p.desc);
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.session)?;
    // The replay must reach the requested frame.
    cfg.set_frames(cfg.frames.max(args.frame + 1));
    let frame = kinetype::render_frame(&cfg, args.frame)?;
    kinetype::write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.session)?;
    let mut session = kinetype::Session::from_config(cfg)?;

    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"));
    let stats = if is_mp4 {
        let mut sink = kinetype::FfmpegSink::new(kinetype::FfmpegSinkOpts::new(&args.out));
        session.run(&mut sink)?
    } else {
        let mut sink = kinetype::PngSequenceSink::new(&args.out);
        session.run(&mut sink)?
    };
    tracing::info!(frames = stats.frames, steps = stats.steps, "render finished");

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sheet(args: SheetArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.session)?;
    if let Some(frame) = args.frame {
        cfg.set_frames(frame + 1);
    }
    let pages = if args.pages.is_empty() {
        EffectId::ALL.to_vec()
    } else {
        args.pages
    };
    let sheet = kinetype::render_sheet(&cfg, &pages, args.columns, args.threads)?;
    kinetype::write_png(&args.out, &sheet)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
