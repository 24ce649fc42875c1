//! Traveling wave threshold with optional noise blend.
//!
//! For a cell at `(x, y)` with accent probability `p` at time `t`:
//!
//! ```text
//! phase     = y * 0.8 - t * 2.0
//! threshold = p + (x * 2/gw - 1 - sin(phase)) * 0.3
//! ```
//!
//! With chaos `c > 0` the threshold is blended with a noisy one,
//! `threshold * (1 - c) + (p + (u - 0.5) * 0.4) * c`. The cell is accent
//! iff the result exceeds 0.5.

use rand::Rng;

use crate::output::CellBuffer;
use crate::palette::Tone;

const ROW_FREQUENCY: f32 = 0.8;
const TIME_FREQUENCY: f32 = 2.0;
const WAVE_AMPLITUDE: f32 = 0.3;
const NOISE_AMPLITUDE: f32 = 0.4;

/// Per-row terms shared by every cell in one row of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveRow {
    /// Row index these terms were computed for
    pub y: usize,
    /// `sin(y * 0.8 - t * 2.0)`
    pub sine: f32,
    /// `2 / grid_width`
    pub inv_width: f32,
    /// Chaos blend fraction
    pub chaos: f32,
}

impl WaveRow {
    /// Compute the row terms for row `y` at time `time`.
    #[inline]
    pub fn new(y: usize, time: f32, grid_width: usize, chaos: f32) -> Self {
        let phase = y as f32 * ROW_FREQUENCY - time * TIME_FREQUENCY;
        Self {
            y,
            sine: phase.sin(),
            inv_width: 2.0 / grid_width.max(1) as f32,
            chaos,
        }
    }

    /// Deterministic part of the threshold for column `x`.
    #[inline]
    pub fn threshold(&self, x: usize, probability: f32) -> f32 {
        let normalized_x = x as f32 * self.inv_width - 1.0;
        probability + (normalized_x - self.sine) * WAVE_AMPLITUDE
    }

    /// Full decision for column `x`. `noise` is only drawn when chaos is
    /// non-zero.
    #[inline]
    pub fn is_accent<R: Rng + ?Sized>(&self, x: usize, probability: f32, noise: &mut R) -> bool {
        let mut threshold = self.threshold(x, probability);
        if self.chaos > 0.0 {
            let u: f32 = noise.gen();
            let noisy = probability + (u - 0.5) * NOISE_AMPLITUDE;
            threshold = threshold * (1.0 - self.chaos) + noisy * self.chaos;
        }
        threshold > 0.5
    }
}

/// Re-render every ambiguous cell of `cells` for time `time`.
///
/// The row cache lives for one call only; the first ambiguous cell of each
/// row recomputes it.
pub(crate) fn step<R: Rng + ?Sized>(cells: &mut CellBuffer, time: f32, chaos: f32, rng: &mut R) {
    let width = cells.width();
    let mut row: Option<WaveRow> = None;

    for i in 0..cells.ambiguous_indices().len() {
        let idx = cells.ambiguous_indices()[i];
        let (x, y) = (idx % width, idx / width);

        let terms = match row {
            Some(cached) if cached.y == y => cached,
            _ => {
                let fresh = WaveRow::new(y, time, width, chaos);
                row = Some(fresh);
                fresh
            }
        };

        let accent = terms.is_accent(x, cells.probability(idx), rng);
        cells.set_color(idx, Tone::from_accent(accent));
    }
}
