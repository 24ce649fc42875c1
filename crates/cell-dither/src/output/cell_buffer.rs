//! Persistent per-cell state and the RGBA output buffer.

use crate::classify::{initial_tone, CellState};
use crate::palette::{Palette, Tone};
use crate::preprocess::GridSize;

/// Counts gathered from a classified [`CellBuffer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationStats {
    /// Number of cells in the grid
    pub total: usize,
    /// Cells fixed to the dark tone
    pub fixed_dark: usize,
    /// Cells fixed to the accent tone
    pub fixed_accent: usize,
    /// Cells re-rendered every frame
    pub ambiguous: usize,
}

impl ClassificationStats {
    /// Fraction of the grid that animates, 0.0..=1.0.
    #[inline]
    pub fn ambiguous_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.ambiguous as f32 / self.total as f32
        }
    }
}

/// Classified cell grid plus the rendered output.
///
/// Allocated once at load time and never resized. The classifier fills it;
/// afterwards only the colors of cells listed in
/// [`ambiguous_indices`](Self::ambiguous_indices) change.
///
/// The RGBA buffer always mirrors [`color`](Self::color): every color write
/// goes through one place that also rewrites the 4 output bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBuffer {
    grid: GridSize,
    states: Vec<CellState>,
    probabilities: Vec<f32>,
    colors: Vec<Tone>,
    ambiguous: Vec<usize>,
    rgba: Vec<u8>,
    dark_rgba: [u8; 4],
    accent_rgba: [u8; 4],
}

impl CellBuffer {
    /// All-dark buffer for `grid`, ready for [`init_cell`](Self::init_cell).
    pub(crate) fn allocate(grid: GridSize, palette: &Palette) -> Self {
        let cells = grid.cells();
        let dark_rgba = palette.rgba(Tone::Dark);
        let mut rgba = Vec::with_capacity(cells * 4);
        for _ in 0..cells {
            rgba.extend_from_slice(&dark_rgba);
        }

        Self {
            grid,
            states: vec![CellState::Fixed(Tone::Dark); cells],
            probabilities: vec![0.0; cells],
            colors: vec![Tone::Dark; cells],
            ambiguous: Vec::with_capacity(cells / 4),
            rgba,
            dark_rgba,
            accent_rgba: palette.rgba(Tone::Accent),
        }
    }

    /// Record the classification of cell `idx`.
    ///
    /// Must be called once per cell in ascending index order, which keeps
    /// the ambiguous index set sorted and free of duplicates.
    pub(crate) fn init_cell(&mut self, idx: usize, state: CellState, probability: f32) {
        debug_assert!(
            self.ambiguous.last().map_or(true, |&last| last < idx),
            "cells must be initialized in scan order"
        );
        self.states[idx] = state;
        self.probabilities[idx] = probability;
        if state.is_ambiguous() {
            self.ambiguous.push(idx);
        }
        self.set_color(idx, initial_tone(state, probability));
    }

    /// Set the rendered tone of cell `idx` and its output bytes.
    #[inline]
    pub(crate) fn set_color(&mut self, idx: usize, tone: Tone) {
        self.colors[idx] = tone;
        let bytes = match tone {
            Tone::Dark => self.dark_rgba,
            Tone::Accent => self.accent_rgba,
        };
        let offset = idx * 4;
        self.rgba[offset..offset + 4].copy_from_slice(&bytes);
    }

    /// Grid dimensions.
    #[inline]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Cells per row.
    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: grids have at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Classification of cell `idx`.
    #[inline]
    pub fn state(&self, idx: usize) -> CellState {
        self.states[idx]
    }

    /// Accent probability of cell `idx` as computed at load time.
    ///
    /// Only drives rendering for ambiguous cells; fixed cells keep the value
    /// for inspection.
    #[inline]
    pub fn probability(&self, idx: usize) -> f32 {
        self.probabilities[idx]
    }

    /// Tone cell `idx` currently renders as.
    #[inline]
    pub fn color(&self, idx: usize) -> Tone {
        self.colors[idx]
    }

    /// All current tones, row-major.
    #[inline]
    pub fn colors(&self) -> &[Tone] {
        &self.colors
    }

    /// Ascending indices of every ambiguous cell.
    #[inline]
    pub fn ambiguous_indices(&self) -> &[usize] {
        &self.ambiguous
    }

    /// Row-major RGBA output, 4 bytes per cell.
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Count cells per classification.
    pub fn stats(&self) -> ClassificationStats {
        let mut stats = ClassificationStats {
            total: self.states.len(),
            fixed_dark: 0,
            fixed_accent: 0,
            ambiguous: 0,
        };
        for state in &self.states {
            match state {
                CellState::Fixed(Tone::Dark) => stats.fixed_dark += 1,
                CellState::Fixed(Tone::Accent) => stats.fixed_accent += 1,
                CellState::Ambiguous => stats.ambiguous += 1,
            }
        }
        stats
    }
}
