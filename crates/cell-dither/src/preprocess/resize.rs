//! Bilinear resampling onto the cell grid.

use super::options::{GridSize, ResampleOptions};
use super::sample::ImageSample;
use crate::color::Srgb;

/// Resample `sample` to one color per grid cell.
///
/// Cell `(x, y)` maps to the fractional source coordinate
/// `(x / grid.width * src_width, y / grid.height * src_height)` and blends
/// the four surrounding source pixels with the standard bilinear weights
/// `(1-fx)(1-fy)`, `fx(1-fy)`, `(1-fx)fy`, `fx*fy`. Neighbours past the
/// right or bottom edge are clamped to the last column or row.
///
/// The brightness threshold from `options` is applied to every result.
pub fn resample_bilinear(
    sample: &ImageSample,
    grid: GridSize,
    options: &ResampleOptions,
) -> Vec<Srgb> {
    let src_w = sample.width();
    let src_h = sample.height();
    let mut out = Vec::with_capacity(grid.cells());

    for gy in 0..grid.height {
        let src_y = gy as f32 / grid.height as f32 * src_h as f32;
        let y0 = (src_y as usize).min(src_h - 1);
        let y1 = if y0 + 1 < src_h { y0 + 1 } else { y0 };
        let fy = src_y - y0 as f32;

        for gx in 0..grid.width {
            let src_x = gx as f32 / grid.width as f32 * src_w as f32;
            let x0 = (src_x as usize).min(src_w - 1);
            let x1 = if x0 + 1 < src_w { x0 + 1 } else { x0 };
            let fx = src_x - x0 as f32;

            let p00 = sample.pixel(x0, y0);
            let p01 = sample.pixel(x1, y0);
            let p10 = sample.pixel(x0, y1);
            let p11 = sample.pixel(x1, y1);

            let w00 = (1.0 - fx) * (1.0 - fy);
            let w01 = fx * (1.0 - fy);
            let w10 = (1.0 - fx) * fy;
            let w11 = fx * fy;

            let blended = Srgb::new(
                p00.r * w00 + p01.r * w01 + p10.r * w10 + p11.r * w11,
                p00.g * w00 + p01.g * w01 + p10.g * w10 + p11.g * w11,
                p00.b * w00 + p01.b * w01 + p10.b * w10 + p11.b * w11,
            );

            out.push(apply_threshold(blended, options.threshold));
        }
    }

    out
}

/// Force `pixel` to black when its luma is below `threshold / 255`.
///
/// A threshold of 0 leaves every pixel untouched.
#[inline]
pub fn apply_threshold(pixel: Srgb, threshold: u8) -> Srgb {
    if threshold > 0 && pixel.luma() < threshold as f32 / 255.0 {
        Srgb::BLACK
    } else {
        pixel
    }
}
