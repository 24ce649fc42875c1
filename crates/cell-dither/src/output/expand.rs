//! Nearest-neighbour expansion of the cell grid to screen pixels.

use super::cell_buffer::CellBuffer;

/// Byte order of an expanded screen buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelLayout {
    /// `[R, G, B, A]`, matching [`CellBuffer::rgba`]
    #[default]
    Rgba,
    /// `[B, G, R, 0]`, the 32-bit ZPixmap order of little-endian X servers
    Bgrx,
}

/// Expand `cells` to a `screen_width` x `screen_height` buffer, 4 bytes per
/// pixel, writing into `out`.
///
/// Every screen pixel takes the color of cell `(x / cell_size, y /
/// cell_size)`. Pixels past the last full cell reuse the last cell of that
/// row or column. `out` is resized to fit, so the same allocation can be
/// reused across frames.
pub fn expand_into(
    cells: &CellBuffer,
    cell_size: usize,
    screen_width: usize,
    screen_height: usize,
    layout: PixelLayout,
    out: &mut Vec<u8>,
) {
    let cell_size = cell_size.max(1);
    let grid_w = cells.width();
    let grid_h = cells.height();
    let src = cells.rgba();

    out.resize(screen_width * screen_height * 4, 0);

    for y in 0..screen_height {
        let cy = (y / cell_size).min(grid_h - 1);
        let src_row = cy * grid_w;
        let dst_row = y * screen_width;

        for x in 0..screen_width {
            let cx = (x / cell_size).min(grid_w - 1);
            let s = (src_row + cx) * 4;
            let d = (dst_row + x) * 4;
            match layout {
                PixelLayout::Rgba => out[d..d + 4].copy_from_slice(&src[s..s + 4]),
                PixelLayout::Bgrx => {
                    out[d] = src[s + 2];
                    out[d + 1] = src[s + 1];
                    out[d + 2] = src[s];
                    out[d + 3] = 0;
                }
            }
        }
    }
}

/// Allocating variant of [`expand_into`].
///
/// ```
/// use cell_dither::{classify, expand_to_screen, GridSize, ImageSample, Palette, PixelLayout, ResampleOptions};
///
/// let palette = Palette::default();
/// let sample = ImageSample::solid(palette.accent(), 2, 2).unwrap();
/// let cells = classify(&sample, GridSize::new(2, 2), &ResampleOptions::new(), &palette);
///
/// let screen = expand_to_screen(&cells, 3, 6, 6, PixelLayout::Rgba);
/// assert_eq!(screen.len(), 6 * 6 * 4);
/// assert_eq!(&screen[0..4], &[255, 140, 0, 255]);
/// ```
pub fn expand_to_screen(
    cells: &CellBuffer,
    cell_size: usize,
    screen_width: usize,
    screen_height: usize,
    layout: PixelLayout,
) -> Vec<u8> {
    let mut out = Vec::new();
    expand_into(cells, cell_size, screen_width, screen_height, layout, &mut out);
    out
}
