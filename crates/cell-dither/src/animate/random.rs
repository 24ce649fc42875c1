//! Independent per-cell sampling.

use rand::Rng;

use crate::output::CellBuffer;
use crate::palette::Tone;

/// Each ambiguous cell becomes accent iff a fresh uniform draw is below its
/// probability, so over many frames a cell shows accent a `p` fraction of
/// the time.
pub(crate) fn step<R: Rng + ?Sized>(cells: &mut CellBuffer, rng: &mut R) {
    for i in 0..cells.ambiguous_indices().len() {
        let idx = cells.ambiguous_indices()[i];
        let u: f32 = rng.gen();
        let accent = u < cells.probability(idx);
        cells.set_color(idx, Tone::from_accent(accent));
    }
}
