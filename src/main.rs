use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use live_dither::app;
use live_dither::models::{AppConfig, CliOverrides, Settings, SurfaceKind};
use live_dither::services::{listen_for_signals, DesktopConfig, RunFlag, Xfconf};
use live_dither::surface;

#[derive(Parser)]
#[command(name = "live-dither")]
#[command(about = "Animated two-tone dithered desktop background")]
#[command(args_conflicts_with_subcommands = true, allow_negative_numbers = true)]
struct Cli {
    /// Restore the desktop background settings and exit
    #[arg(short, long)]
    restore: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the image on the desktop (default)
    Run(RunArgs),
    /// Restore the desktop background settings after a crash
    Restore,
    /// Classify an image and print statistics, without animating
    Classify(ClassifyArgs),
}

#[derive(Args, Clone, Default)]
struct RunArgs {
    /// Image to display
    image: Option<PathBuf>,

    /// 0 = static, 1 = random, 2 = wave
    algorithm: Option<i64>,

    /// Darkness cutoff, 0-255
    threshold: Option<i64>,

    /// Cell size in pixels
    cell_size: Option<i64>,

    /// Frame cap, 0 = unlimited
    max_fps: Option<i64>,

    /// Non-zero logs the achieved frame rate
    profile: Option<i64>,

    /// Wave noise, 0-100
    chaos: Option<i64>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accent color as hex, e.g. "#FF8C00"
    #[arg(long)]
    accent: Option<String>,

    /// auto, x11, windows or snapshot
    #[arg(long)]
    surface: Option<SurfaceKind>,

    /// Output directory for the snapshot surface
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Stop after this many frames (snapshot surface)
    #[arg(long)]
    frames: Option<u64>,

    /// Fixed noise seed
    #[arg(long)]
    seed: Option<u64>,
}

impl RunArgs {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            image: self.image.clone(),
            algorithm: self.algorithm,
            threshold: self.threshold,
            cell_size: self.cell_size,
            max_fps: self.max_fps,
            profile: self.profile,
            chaos: self.chaos,
            accent: self.accent.clone(),
            surface: self.surface,
            snapshot_dir: self.snapshot_dir.clone(),
            snapshot_frames: self.frames,
            seed: self.seed,
        }
    }
}

#[derive(Args)]
struct ClassifyArgs {
    /// Image to classify
    image: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Darkness cutoff, 0-255
    #[arg(long)]
    threshold: Option<i64>,

    /// Cell size in pixels
    #[arg(long)]
    cell_size: Option<i64>,

    /// Accent color as hex
    #[arg(long)]
    accent: Option<String>,

    /// Write the classified frame to this PNG file
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Virtual screen width for the grid and preview
    #[arg(long)]
    screen_width: Option<u32>,

    /// Virtual screen height for the grid and preview
    #[arg(long)]
    screen_height: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.restore {
        return run_restore_command();
    }
    match cli.command {
        Some(Commands::Run(args)) => run_live_command(&args),
        Some(Commands::Restore) => run_restore_command(),
        Some(Commands::Classify(args)) => run_classify_command(&args),
        None => run_live_command(&cli.run),
    }
}

fn init_logging(with_time: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "live_dither=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if with_time {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

/// Animate until a signal arrives or the surface closes
fn run_live_command(args: &RunArgs) -> anyhow::Result<()> {
    init_logging(true);

    let settings = load_settings(args.config.as_deref(), &args.overrides())?;
    log_banner(&settings);

    let flag = RunFlag::new();
    if let Err(e) = listen_for_signals(flag.clone()) {
        tracing::warn!(%e, "Failed to install signal handlers");
    }

    let mut desktop = app::desktop_for(surface::resolve(settings.surface));
    let summary = app::run_live(&settings, desktop.as_mut(), &flag)?;
    tracing::info!(frames = summary.frames, "Shutdown complete");
    Ok(())
}

/// Standalone recovery after a crash that skipped restoration
fn run_restore_command() -> anyhow::Result<()> {
    init_logging(false);
    Xfconf::new().restore();
    Ok(())
}

fn run_classify_command(args: &ClassifyArgs) -> anyhow::Result<()> {
    init_logging(false);

    let overrides = CliOverrides {
        image: args.image.clone(),
        threshold: args.threshold,
        cell_size: args.cell_size,
        accent: args.accent.clone(),
        ..Default::default()
    };
    let mut settings = load_settings(args.config.as_deref(), &overrides)?;
    if let Some(width) = args.screen_width {
        settings.screen_width = width.max(1) as usize;
    }
    if let Some(height) = args.screen_height {
        settings.screen_height = height.max(1) as usize;
    }

    let stats = app::classify_image(&settings, args.preview.as_deref())?;
    println!(
        "{} ambiguous cells out of {} ({:.2}%)",
        stats.ambiguous,
        stats.total,
        stats.ambiguous_ratio() * 100.0
    );
    println!("  fixed dark:   {}", stats.fixed_dark);
    println!("  fixed accent: {}", stats.fixed_accent);
    Ok(())
}

fn load_settings(config: Option<&Path>, overrides: &CliOverrides) -> anyhow::Result<Settings> {
    let mut config = AppConfig::load(config)?;
    config.apply(overrides);
    Ok(config.clamped())
}

fn log_banner(settings: &Settings) {
    let max_fps = if settings.max_fps == 0 {
        "unlimited".to_string()
    } else {
        settings.max_fps.to_string()
    };
    tracing::info!(
        platform = std::env::consts::OS,
        surface = ?surface::resolve(settings.surface),
        image = %settings.image.display(),
        algorithm = settings.algorithm.name(),
        threshold = settings.threshold,
        cell_size = settings.cell_size,
        max_fps = %max_fps,
        chaos = settings.chaos,
        "live-dither starting"
    );
}
