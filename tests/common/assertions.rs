//! Assertion helpers for tests.

use image::RgbaImage;
use pretty_assertions::assert_eq;
use std::path::Path;

/// Assert the file is a PNG of the given size and return its pixels
pub fn assert_png_file(path: &Path, width: u32, height: u32) -> RgbaImage {
    let img = image::open(path)
        .unwrap_or_else(|e| panic!("Expected PNG at {}: {e}", path.display()))
        .to_rgba8();
    assert_eq!(
        img.dimensions(),
        (width, height),
        "Unexpected size for {}",
        path.display()
    );
    img
}

/// Assert every pixel is one of the two palette entries
pub fn assert_two_tone(img: &RgbaImage, dark: [u8; 4], accent: [u8; 4]) {
    for (x, y, pixel) in img.enumerate_pixels() {
        assert!(
            pixel.0 == dark || pixel.0 == accent,
            "Pixel ({x}, {y}) is {:?}, expected {dark:?} or {accent:?}",
            pixel.0
        );
    }
}

/// Assert each `cell`x`cell` block of the image is a single color
pub fn assert_blocky(img: &RgbaImage, cell: u32) {
    let (width, height) = img.dimensions();
    for y in 0..height {
        for x in 0..width {
            let origin = img.get_pixel((x / cell) * cell, (y / cell) * cell);
            assert_eq!(
                img.get_pixel(x, y),
                origin,
                "Pixel ({x}, {y}) differs from its cell origin"
            );
        }
    }
}
