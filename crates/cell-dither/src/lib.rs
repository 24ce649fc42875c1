//! cell-dither: animated two-color dithering on a cell grid
//!
//! An image is resampled onto a grid of cells, every cell is classified
//! once against a two-color palette, and only the cells whose color is
//! genuinely in between the two palette colors are re-rendered each frame.
//!
//! # Quick Start
//!
//! The [`DitherEngine`] builder is the primary entry point:
//!
//! ```
//! use cell_dither::{Algorithm, DitherEngine, GridSize, ImageSample, Palette, Srgb};
//!
//! let sample = ImageSample::solid(Srgb::from_u8(128, 70, 0), 64, 36).unwrap();
//!
//! let mut engine = DitherEngine::new(Palette::default())
//!     .algorithm(Algorithm::Wave)
//!     .threshold(40)
//!     .chaos(10)
//!     .load(&sample, GridSize::from_screen(1920, 1080, 8));
//!
//! let frame = engine.next_frame();
//! assert_eq!(frame.len(), 240 * 135 * 4);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ImageSample            (validated sRGB source)
//!     |
//!     v
//! resample_bilinear      (one sample per cell, darkness threshold)
//!     |
//!     v
//! classify               (accent probability, Fixed(Dark|Accent) or Ambiguous)
//!     |
//!     v
//! CellBuffer             (states, probabilities, colors, RGBA output)
//!     |
//!     v
//! ╔══════════════════════════════════════╗
//! ║  Frame loop                          ║
//! ║                                      ║
//! ║  Animator::step                      ║
//! ║    for idx in ambiguous_indices:     ║
//! ║      Static | Random | Wave          ║
//! ║      set_color(idx, tone)            ║
//! ║      |                               ║
//! ║      v                               ║
//! ║  rgba() / expand_to_screen()         ║
//! ╚══════════════════════════════════════╝
//! ```
//!
//! # Accent Probability
//!
//! For a sample `s` with RGB Euclidean distances `d_dark` and `d_accent` to
//! the two palette colors:
//!
//! ```text
//! p = d_dark / (d_dark + d_accent)      (0.5 when the sum is ~0)
//! ```
//!
//! Cells with `p < 0.3` are fixed dark, `p > 0.7` fixed accent, everything
//! in between animates. Distances are measured in gamma-encoded sRGB
//! without any perceptual weighting.

pub mod animate;
pub mod api;
pub mod classify;
pub mod color;
pub mod output;
pub mod palette;
pub mod preprocess;

#[cfg(test)]
mod domain_tests;

pub use animate::{Algorithm, AnimationOptions, Animator, WaveRow};
pub use api::{DitherEngine, EngineError, LoadedEngine};
pub use classify::{bucket, classify, initial_tone, CellState, AMBIGUOUS_HIGH, AMBIGUOUS_LOW};
pub use color::Srgb;
pub use output::{expand_into, expand_to_screen, CellBuffer, ClassificationStats, PixelLayout};
pub use palette::{Palette, PaletteError, ParseColorError, Tone};
pub use preprocess::{
    apply_threshold, resample_bilinear, GridSize, ImageSample, ResampleOptions, SampleError,
};
