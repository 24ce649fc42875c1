pub mod snapshot;
#[cfg(all(feature = "x11", target_os = "linux"))]
pub mod x11;
#[cfg(windows)]
pub mod windows;

pub use snapshot::{write_png, SnapshotSurface};
#[cfg(all(feature = "x11", target_os = "linux"))]
pub use x11::X11Surface;
#[cfg(windows)]
pub use windows::WindowsSurface;

use cell_dither::CellBuffer;

use crate::error::SurfaceError;
use crate::models::{Settings, SurfaceKind};

/// Result of draining a surface's pending events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    Open,
    /// The window was destroyed or the surface ran out of frames
    Closed,
}

/// A screen-sized target the scheduler presents frames to
pub trait DesktopSurface {
    /// Short backend name for logging
    fn name(&self) -> &'static str;

    /// Screen size in pixels
    fn size(&self) -> (usize, usize);

    /// Expand `cells` to screen resolution and show it
    fn present(&mut self, cells: &CellBuffer) -> Result<(), SurfaceError>;

    /// Drain pending events without blocking
    fn poll_events(&mut self) -> SurfaceStatus;

    /// Give the screen back. Safe to call more than once.
    fn release(&mut self);
}

/// True when this build can open an X11 window
pub fn x11_available() -> bool {
    cfg!(all(feature = "x11", target_os = "linux")) && std::env::var_os("DISPLAY").is_some()
}

/// Pick the concrete surface for `kind`
pub fn resolve(kind: SurfaceKind) -> SurfaceKind {
    match kind {
        SurfaceKind::Auto if cfg!(windows) => SurfaceKind::Windows,
        SurfaceKind::Auto if x11_available() => SurfaceKind::X11,
        SurfaceKind::Auto => SurfaceKind::Snapshot,
        other => other,
    }
}

/// Open the surface selected by `settings`
pub fn acquire(settings: &Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError> {
    match resolve(settings.surface) {
        SurfaceKind::X11 => acquire_x11(settings),
        SurfaceKind::Windows => acquire_windows(settings),
        _ => {
            let surface = SnapshotSurface::create(
                &settings.snapshot_dir,
                settings.screen_width,
                settings.screen_height,
                settings.cell_size,
            )?
            .every(settings.snapshot_every)
            .frame_limit(settings.snapshot_frames);
            Ok(Box::new(surface))
        }
    }
}

#[cfg(all(feature = "x11", target_os = "linux"))]
fn acquire_x11(settings: &Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError> {
    Ok(Box::new(X11Surface::open(settings.cell_size)?))
}

#[cfg(not(all(feature = "x11", target_os = "linux")))]
fn acquire_x11(_settings: &Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError> {
    Err(SurfaceError::Unsupported(
        "x11 (rebuild with --features x11 on Linux)",
    ))
}

#[cfg(windows)]
fn acquire_windows(settings: &Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError> {
    Ok(Box::new(WindowsSurface::open(settings.cell_size)?))
}

#[cfg(not(windows))]
fn acquire_windows(_settings: &Settings) -> Result<Box<dyn DesktopSurface>, SurfaceError> {
    Err(SurfaceError::Unsupported("windows (only available on Windows)"))
}
