//! Test images, engines and settings.

use cell_dither::{Algorithm, DitherEngine, GridSize, ImageSample, LoadedEngine, Srgb};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

use live_dither::models::{Settings, SurfaceKind};

/// Fixed seed so animated frames are reproducible
pub const SEED: u64 = 0x5EED;

/// Horizontal ramp from black to orange, so every band is represented
pub fn ramp_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        let t = x as f32 / (width.max(2) - 1) as f32;
        Rgb([(255.0 * t) as u8, (140.0 * t) as u8, 0])
    })
}

/// Save [`ramp_image`] as a PNG in `dir`
pub fn write_ramp_png(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("ramp.png");
    ramp_image(width, height)
        .save(&path)
        .expect("Failed to write fixture image");
    path
}

pub fn ramp_sample(width: usize, height: usize) -> ImageSample {
    let img = ramp_image(width as u32, height as u32);
    ImageSample::from_rgb8(img.as_raw(), width, height).expect("valid sample")
}

/// A mid-orange sample, every cell ambiguous with the default palette
pub fn half_orange_sample() -> ImageSample {
    ImageSample::solid(Srgb::from_u8(128, 70, 0), 4, 4).expect("valid sample")
}

/// Seeded engine over a 16x4 grid of the ramp
pub fn ramp_engine(algorithm: Algorithm) -> LoadedEngine {
    DitherEngine::new(Default::default())
        .algorithm(algorithm)
        .seed(SEED)
        .load(&ramp_sample(64, 16), GridSize::new(16, 4))
}

/// Settings for a short headless run writing into `dir`
pub fn snapshot_settings(image: PathBuf, dir: &Path, frames: u64) -> Settings {
    Settings {
        image,
        surface: SurfaceKind::Snapshot,
        snapshot_dir: dir.join("frames"),
        snapshot_every: 1,
        snapshot_frames: frames,
        screen_width: 32,
        screen_height: 16,
        cell_size: 4,
        max_fps: 0,
        report_timing: false,
        seed: Some(SEED),
        ..Default::default()
    }
}
