//! Output types for the dithering pipeline.
//!
//! [`CellBuffer`] is the canonical state: per-cell classification, current
//! tone and a grid-resolution RGBA buffer. Screen-resolution buffers are
//! produced on demand by [`expand_into`] / [`expand_to_screen`] in either
//! [`PixelLayout::Rgba`] or [`PixelLayout::Bgrx`].

mod cell_buffer;
mod expand;

pub use cell_buffer::{CellBuffer, ClassificationStats};
pub use expand::{expand_into, expand_to_screen, PixelLayout};
