//! Image file to PNG frames through the snapshot surface.

mod common;

use cell_dither::{Algorithm, Palette, Tone};
use common::{fixtures, MockSurface, RecordingDesktop};
use live_dither::app;
use live_dither::error::{AppError, SurfaceError};
use live_dither::models::Settings;
use live_dither::surface::DesktopSurface;
use live_dither::services::{RunFlag, StopReason};
use pretty_assertions::assert_eq;

fn palette_rgba() -> ([u8; 4], [u8; 4]) {
    let palette = Palette::default();
    (palette.rgba(Tone::Dark), palette.rgba(Tone::Accent))
}

#[test]
fn test_live_run_writes_snapshot_frames() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 64, 32);
    let settings = fixtures::snapshot_settings(image, dir.path(), 3);

    let mut desktop = RecordingDesktop::default();
    let summary = app::run_live(&settings, &mut desktop, &RunFlag::new()).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.reason, StopReason::SurfaceClosed);
    assert_eq!((desktop.prepared, desktop.restored), (1, 1));

    let (dark, accent) = palette_rgba();
    for index in 0..3 {
        let path = settings.snapshot_dir.join(format!("frame-{index:06}.png"));
        let img = common::assert_png_file(&path, 32, 16);
        common::assert_two_tone(&img, dark, accent);
        common::assert_blocky(&img, 4);
    }
    assert!(!settings.snapshot_dir.join("frame-000003.png").exists());
}

#[test]
fn test_snapshot_every_skips_frames() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 16, 16);
    let settings = Settings {
        snapshot_every: 2,
        ..fixtures::snapshot_settings(image, dir.path(), 4)
    };

    app::run_live(&settings, &mut RecordingDesktop::default(), &RunFlag::new()).unwrap();

    let mut written: Vec<String> = std::fs::read_dir(&settings.snapshot_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    written.sort();
    assert_eq!(written, vec!["frame-000000.png", "frame-000002.png"]);
}

#[test]
fn test_missing_image_is_fatal_and_releases_surface() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fixtures::snapshot_settings(dir.path().join("missing.jpg"), dir.path(), 3);
    let mut surface = MockSurface::new(32, 16);

    let result = app::run_on_surface(&settings, &mut surface, &RunFlag::new());

    assert!(matches!(result, Err(AppError::ImageLoad { .. })));
    assert!(surface.frames.is_empty());
    assert_eq!(surface.released, 1);
}

#[test]
fn test_image_load_failure_restores_desktop() {
    let dir = tempfile::tempdir().unwrap();
    let settings = fixtures::snapshot_settings(dir.path().join("missing.jpg"), dir.path(), 3);
    let mut desktop = RecordingDesktop::default();

    let result = app::run_live(&settings, &mut desktop, &RunFlag::new());

    assert!(matches!(result, Err(AppError::ImageLoad { .. })));
    assert_eq!((desktop.prepared, desktop.restored), (1, 1));
}

#[test]
fn test_surface_acquisition_failure_restores_desktop() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 16, 16);
    // A regular file where the snapshot directory should go
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let settings = Settings {
        snapshot_dir: blocker.join("frames"),
        ..fixtures::snapshot_settings(image, dir.path(), 3)
    };
    let mut desktop = RecordingDesktop::default();

    let result = app::run_live(&settings, &mut desktop, &RunFlag::new());

    assert!(matches!(result, Err(AppError::SurfaceAcquisition(_))));
    assert_eq!((desktop.prepared, desktop.restored), (1, 1));
}

#[test]
fn test_present_failure_restores_desktop() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 16, 16);
    let settings = fixtures::snapshot_settings(image, dir.path(), 3);
    let mut desktop = RecordingDesktop::default();

    let result = app::run_with_surface(&settings, &mut desktop, &RunFlag::new(), |_| {
        let surface: Box<dyn DesktopSurface> = Box::new(MockSurface::new(32, 16).fail_at(0));
        Ok(surface)
    });

    assert!(matches!(
        result,
        Err(AppError::Present(SurfaceError::Unavailable(_)))
    ));
    assert_eq!((desktop.prepared, desktop.restored), (1, 1));
}

#[test]
fn test_grid_follows_surface_size_and_cell_size() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 10, 10);
    let settings = Settings {
        image,
        cell_size: 3,
        ..Default::default()
    };

    // Trailing partial cells are dropped
    let engine = app::load_engine(&settings, (100, 50)).unwrap();
    assert_eq!(engine.cells().width(), 33);
    assert_eq!(engine.cells().height(), 16);
}

#[test]
fn test_classify_writes_preview() {
    let dir = tempfile::tempdir().unwrap();
    let image = fixtures::write_ramp_png(dir.path(), 64, 32);
    let preview = dir.path().join("preview.png");
    let settings = Settings {
        image,
        algorithm: Algorithm::Static,
        screen_width: 40,
        screen_height: 20,
        cell_size: 5,
        ..Default::default()
    };

    let stats = app::classify_image(&settings, Some(&preview)).unwrap();
    assert_eq!(stats.total, 8 * 4);
    assert_eq!(
        stats.fixed_dark + stats.fixed_accent + stats.ambiguous,
        stats.total
    );
    assert!(stats.ambiguous > 0);

    let (dark, accent) = palette_rgba();
    let img = common::assert_png_file(&preview, 40, 20);
    common::assert_two_tone(&img, dark, accent);
    common::assert_blocky(&img, 5);
}

#[test]
fn test_dark_image_has_no_ambiguous_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dark.png");
    image::RgbImage::from_pixel(8, 8, image::Rgb([20, 20, 20]))
        .save(&path)
        .unwrap();
    let settings = Settings {
        image: path,
        threshold: 40,
        screen_width: 8,
        screen_height: 8,
        ..Default::default()
    };

    let stats = app::classify_image(&settings, None).unwrap();
    assert_eq!(stats.ambiguous, 0);
    assert_eq!(stats.fixed_dark, 64);
}
