//! Static/dynamic partition of the cell grid.
//!
//! Every cell is bucketed once by its accent probability:
//!
//! | probability      | state              |
//! |------------------|--------------------|
//! | `< 0.3`          | `Fixed(Dark)`      |
//! | `> 0.7`          | `Fixed(Accent)`    |
//! | `0.3 ..= 0.7`    | `Ambiguous`        |
//!
//! Fixed cells are written once and never revisited. Only ambiguous cells
//! are handed to the animator, so the band width directly sets how much of
//! the image animates and how much each frame costs.

use crate::output::CellBuffer;
use crate::palette::{Palette, Tone};
use crate::preprocess::{resample_bilinear, GridSize, ImageSample, ResampleOptions};

/// Probabilities strictly below this are fixed dark.
pub const AMBIGUOUS_LOW: f32 = 0.3;

/// Probabilities strictly above this are fixed accent.
pub const AMBIGUOUS_HIGH: f32 = 0.7;

/// Classification of a single cell. Never changes after load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Always rendered in the given tone
    Fixed(Tone),
    /// Re-rendered every frame by the animator
    Ambiguous,
}

impl CellState {
    /// True for [`CellState::Ambiguous`].
    #[inline]
    pub fn is_ambiguous(self) -> bool {
        matches!(self, CellState::Ambiguous)
    }
}

/// Bucket an accent probability into a [`CellState`].
///
/// ```
/// use cell_dither::{bucket, CellState, Tone};
///
/// assert_eq!(bucket(0.1), CellState::Fixed(Tone::Dark));
/// assert_eq!(bucket(0.3), CellState::Ambiguous);
/// assert_eq!(bucket(0.7), CellState::Ambiguous);
/// assert_eq!(bucket(0.9), CellState::Fixed(Tone::Accent));
/// ```
#[inline]
pub fn bucket(probability: f32) -> CellState {
    if probability < AMBIGUOUS_LOW {
        CellState::Fixed(Tone::Dark)
    } else if probability > AMBIGUOUS_HIGH {
        CellState::Fixed(Tone::Accent)
    } else {
        CellState::Ambiguous
    }
}

/// Color a cell shows before the first animation step.
///
/// Fixed cells show their tone. Ambiguous cells take whichever side of 0.5
/// their probability falls on, which is also what static mode keeps forever.
#[inline]
pub fn initial_tone(state: CellState, probability: f32) -> Tone {
    match state {
        CellState::Fixed(tone) => tone,
        CellState::Ambiguous => Tone::from_accent(probability > 0.5),
    }
}

/// Resample `sample` onto `grid` and classify every cell.
///
/// Pure function of its inputs: the same sample, grid, options and palette
/// always produce an identical [`CellBuffer`].
pub fn classify(
    sample: &ImageSample,
    grid: GridSize,
    options: &ResampleOptions,
    palette: &Palette,
) -> CellBuffer {
    let samples = resample_bilinear(sample, grid, options);
    let mut cells = CellBuffer::allocate(grid, palette);

    for (idx, &color) in samples.iter().enumerate() {
        let probability = palette.accent_probability(color);
        cells.init_cell(idx, bucket(probability), probability);
    }

    cells
}
