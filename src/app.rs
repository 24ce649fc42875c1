//! Wiring shared by the binary and the integration tests.

use cell_dither::{
    expand_to_screen, ClassificationStats, DitherEngine, GridSize, LoadedEngine, PixelLayout,
};
use std::path::Path;

use crate::error::{AppError, SurfaceError};
use crate::models::{Settings, SurfaceKind};
use crate::services::{
    load_image, DesktopConfig, DesktopGuard, FrameScheduler, NoDesktopConfig, RunFlag,
    RunSummary, SchedulerOptions, Xfconf,
};
use crate::surface::{self, write_png, DesktopSurface};

/// Engine configured from validated settings
pub fn build_engine(settings: &Settings) -> DitherEngine {
    let engine = DitherEngine::new(settings.palette.clone())
        .algorithm(settings.algorithm)
        .threshold(settings.threshold)
        .chaos(settings.chaos);
    match settings.seed {
        Some(seed) => engine.seed(seed),
        None => engine,
    }
}

/// Desktop integration matching a resolved surface kind
pub fn desktop_for(kind: SurfaceKind) -> Box<dyn DesktopConfig> {
    match kind {
        SurfaceKind::X11 => Box::new(Xfconf::new()),
        _ => Box::new(NoDesktopConfig),
    }
}

/// Full live run: prepare `desktop`, acquire the surface for `settings`,
/// animate until stopped. The desktop is restored on every path.
pub fn run_live(
    settings: &Settings,
    desktop: &mut dyn DesktopConfig,
    flag: &RunFlag,
) -> Result<RunSummary, AppError> {
    run_with_surface(settings, desktop, flag, surface::acquire)
}

/// [`run_live`] with a caller-provided surface constructor
pub fn run_with_surface<F>(
    settings: &Settings,
    desktop: &mut dyn DesktopConfig,
    flag: &RunFlag,
    acquire: F,
) -> Result<RunSummary, AppError>
where
    F: FnOnce(&Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError>,
{
    let _restore = DesktopGuard::new(desktop);
    let mut surface = acquire(settings).map_err(AppError::SurfaceAcquisition)?;
    run_on_surface(settings, surface.as_mut(), flag)
}

/// Load the image, classify it for `surface` and run the frame loop.
///
/// The surface is released before returning, including when the image
/// cannot be loaded.
pub fn run_on_surface(
    settings: &Settings,
    surface: &mut dyn DesktopSurface,
    flag: &RunFlag,
) -> Result<RunSummary, AppError> {
    let mut engine = match load_engine(settings, surface.size()) {
        Ok(engine) => engine,
        Err(e) => {
            surface.release();
            return Err(e);
        }
    };

    let options = SchedulerOptions {
        max_fps: settings.max_fps,
        report_timing: settings.report_timing,
    };
    FrameScheduler::new(options)
        .run(&mut engine, surface, flag)
        .map_err(AppError::Present)
}

/// Decode `settings.image` and classify it for a screen of `size` pixels
pub fn load_engine(settings: &Settings, size: (usize, usize)) -> Result<LoadedEngine, AppError> {
    let sample = load_image(&settings.image)?;
    let grid = GridSize::from_screen(size.0, size.1, settings.cell_size);
    let engine = build_engine(settings).load(&sample, grid);
    log_stats(grid, &engine.stats());
    Ok(engine)
}

/// Classify without animating, optionally writing the first frame as PNG
pub fn classify_image(
    settings: &Settings,
    preview: Option<&Path>,
) -> Result<ClassificationStats, AppError> {
    let size = (settings.screen_width, settings.screen_height);
    let engine = load_engine(settings, size)?;

    if let Some(path) = preview {
        let rgba = expand_to_screen(
            engine.cells(),
            settings.cell_size,
            size.0,
            size.1,
            PixelLayout::Rgba,
        );
        write_png(path, size.0, size.1, &rgba).map_err(AppError::Present)?;
        tracing::info!(path = %path.display(), "Wrote preview");
    }
    Ok(engine.stats())
}

fn log_stats(grid: GridSize, stats: &ClassificationStats) {
    tracing::info!(
        grid_width = grid.width,
        grid_height = grid.height,
        ambiguous = stats.ambiguous,
        total = stats.total,
        percent = format_args!("{:.2}", stats.ambiguous_ratio() * 100.0),
        "Classified cells"
    );
}
