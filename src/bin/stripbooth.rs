use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use stripbooth::{
    BoothConfig, DirectoryFrameSource, DownloadSink, FrameSource, ImageBuffer, NoShare,
    PhotoBooth, SessionEvent, SessionStatus, ShareMeta, StaticFrameSource, StripCompositor,
};

#[derive(Parser, Debug)]
#[command(name = "stripbooth", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a timed capture session and save the resulting strip.
    Shoot(ShootArgs),
    /// Compose a strip from existing image files.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct ShootArgs {
    /// Directory of images to use as camera frames. Without it a generated test pattern is used.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Directory the strip is saved into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Booth config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of photos.
    #[arg(long)]
    count: Option<u32>,

    /// Countdown seconds before each photo.
    #[arg(long)]
    countdown: Option<u32>,

    /// Seconds between photos.
    #[arg(long)]
    pause: Option<u32>,

    /// Seconds between camera start and the first countdown.
    #[arg(long)]
    warmup: Option<u32>,

    /// Skip all strip text.
    #[arg(long)]
    no_text: bool,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Booth config JSON (only the strip style is used).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Header date as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<chrono::NaiveDate>,

    /// Skip all strip text.
    #[arg(long)]
    no_text: bool,

    /// Input images, top to bottom.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Shoot(args) => cmd_shoot(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BoothConfig> {
    Ok(match path {
        Some(p) => BoothConfig::load(p)?,
        None => BoothConfig::default(),
    })
}

fn cmd_shoot(args: ShootArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let s = &mut config.session;
    s.target_count = args.count.unwrap_or(s.target_count);
    s.countdown_secs = args.countdown.unwrap_or(s.countdown_secs);
    s.pause_secs = args.pause.unwrap_or(s.pause_secs);
    s.warmup_secs = args.warmup.unwrap_or(s.warmup_secs);
    if args.no_text {
        config.strip = config.strip.without_text();
    }

    let mut source: Box<dyn FrameSource> = match &args.frames {
        Some(dir) => Box::new(DirectoryFrameSource::new(dir)),
        None => Box::new(StaticFrameSource::pattern(
            config.session.camera.width,
            config.session.camera.height,
        )),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    rt.block_on(shoot(config, source.as_mut(), &args.out_dir))
}

async fn shoot(
    config: BoothConfig,
    source: &mut dyn FrameSource,
    out_dir: &Path,
) -> anyhow::Result<()> {
    let mut booth = PhotoBooth::new(config)?;
    let (seq, handle) = booth.sequencer(source)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_events(rx));

    let outcome = {
        let run = booth.run_session(seq.with_events(tx));
        tokio::pin!(run);
        loop {
            tokio::select! {
                r = &mut run => break r?,
                r = tokio::signal::ctrl_c() => {
                    r.context("listen for ctrl-c")?;
                    handle.cancel();
                }
            }
        }
    };
    printer.await.context("event printer task")?;

    if outcome.status != SessionStatus::Complete {
        anyhow::bail!("session ended as {:?}", outcome.status);
    }
    let artifact = booth
        .artifact()
        .context("session completed without a strip")?;

    let sink = DownloadSink::new(out_dir);
    let delivery = stripbooth::deliver(artifact, &NoShare, &ShareMeta::default(), &sink).await?;
    if let stripbooth::Delivery::Downloaded(path) = delivery {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

async fn print_events(mut rx: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(ev) = rx.recv().await {
        match ev {
            SessionEvent::CameraReady => eprintln!("camera ready"),
            SessionEvent::Tick { photo, remaining } => eprintln!("photo {photo}: {remaining}..."),
            SessionEvent::Captured {
                photo,
                width,
                height,
            } => eprintln!("photo {photo}: snap! ({width}x{height})"),
            SessionEvent::Pausing { .. } => {}
            SessionEvent::Completed { count } => eprintln!("captured {count} photos"),
            SessionEvent::Cancelled => eprintln!("cancelled"),
            SessionEvent::PermissionDenied => eprintln!("camera unavailable"),
            SessionEvent::Failed { reason } => eprintln!("session failed: {reason}"),
        }
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let style = if args.no_text {
        config.strip.without_text()
    } else {
        config.strip
    };
    let compositor = StripCompositor::new(style)?;

    let images = args
        .inputs
        .iter()
        .map(|p| {
            let bytes =
                std::fs::read(p).with_context(|| format!("read image '{}'", p.display()))?;
            ImageBuffer::from_encoded(bytes)
                .with_context(|| format!("load image '{}'", p.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let artifact = match args.date {
        Some(date) => compositor.compose_on(&images, date)?,
        None => compositor.compose(&images)?,
    };
    artifact.save(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
