//! Per-frame re-rendering of ambiguous cells.
//!
//! # Algorithms
//!
//! | index | algorithm  | behavior                                          |
//! |-------|------------|---------------------------------------------------|
//! | 0     | [`Static`] | nothing changes after classification              |
//! | 1     | [`Random`] | accent iff `u < p`, fresh `u` per cell per frame   |
//! | 2     | [`Wave`]   | diagonal sine threshold, optionally noise-blended |
//!
//! Fixed cells are never visited. The animation clock advances by
//! [`AnimationOptions::time_step`] after every animated frame and stays put
//! in static mode.
//!
//! [`Static`]: Algorithm::Static
//! [`Random`]: Algorithm::Random
//! [`Wave`]: Algorithm::Wave
//!
//! # Example
//!
//! ```
//! use cell_dither::{classify, Algorithm, AnimationOptions, Animator, GridSize, ImageSample, Palette, ResampleOptions};
//!
//! let palette = Palette::default();
//! let mid = palette.dark().lerp(palette.accent(), 0.5);
//! let sample = ImageSample::solid(mid, 4, 4).unwrap();
//! let mut cells = classify(&sample, GridSize::new(4, 4), &ResampleOptions::new(), &palette);
//!
//! let mut animator = Animator::seeded(Algorithm::Wave, AnimationOptions::new().chaos(0), 7);
//! animator.step(&mut cells);
//! assert!((animator.time() - 0.016).abs() < 1e-6);
//! ```

mod options;
mod random;
mod wave;

pub use options::{AnimationOptions, DEFAULT_TIME_STEP, MAX_CHAOS};
pub use wave::WaveRow;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::output::CellBuffer;

/// Animation algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// No animation. Ambiguous cells keep their initial tone.
    Static,
    /// Independent random draw per cell per frame.
    Random,
    /// Traveling diagonal wave blended with noise by `chaos`.
    #[default]
    Wave,
}

impl Algorithm {
    /// Map a numeric selector to an algorithm.
    ///
    /// `0` static, `1` random, `2` wave. Anything else falls back to
    /// [`Algorithm::Random`].
    ///
    /// ```
    /// use cell_dither::Algorithm;
    ///
    /// assert_eq!(Algorithm::from_index(2), Algorithm::Wave);
    /// assert_eq!(Algorithm::from_index(7), Algorithm::Random);
    /// ```
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Algorithm::Static,
            2 => Algorithm::Wave,
            _ => Algorithm::Random,
        }
    }

    /// Whether `index` names an algorithm without falling back.
    #[inline]
    pub fn is_valid_index(index: i32) -> bool {
        (0..=2).contains(&index)
    }

    /// Numeric selector for this algorithm.
    #[inline]
    pub fn index(self) -> i32 {
        match self {
            Algorithm::Static => 0,
            Algorithm::Random => 1,
            Algorithm::Wave => 2,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Static => "Static",
            Algorithm::Random => "Random",
            Algorithm::Wave => "Wave",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the animation clock and the noise source.
///
/// One animator drives one [`CellBuffer`]. It only writes cells listed in
/// [`CellBuffer::ambiguous_indices`].
#[derive(Debug, Clone)]
pub struct Animator {
    algorithm: Algorithm,
    options: AnimationOptions,
    rng: SmallRng,
    time: f32,
}

impl Animator {
    /// Animator with an entropy-seeded noise source.
    pub fn new(algorithm: Algorithm, options: AnimationOptions) -> Self {
        Self::with_rng(algorithm, options, SmallRng::from_entropy())
    }

    /// Animator with a fixed seed. Two animators built with the same seed
    /// and options produce identical frames.
    pub fn seeded(algorithm: Algorithm, options: AnimationOptions, seed: u64) -> Self {
        Self::with_rng(algorithm, options, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(algorithm: Algorithm, options: AnimationOptions, rng: SmallRng) -> Self {
        Self {
            algorithm,
            options: options.chaos(options.chaos),
            rng,
            time: 0.0,
        }
    }

    /// Selected algorithm.
    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Active options.
    #[inline]
    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    /// Current animation clock.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Re-render the ambiguous cells of `cells` for the current time, then
    /// advance the clock.
    ///
    /// Static mode returns immediately without touching the buffer or the
    /// clock.
    pub fn step(&mut self, cells: &mut CellBuffer) {
        match self.algorithm {
            Algorithm::Static => return,
            Algorithm::Random => random::step(cells, &mut self.rng),
            Algorithm::Wave => wave::step(
                cells,
                self.time,
                self.options.chaos_fraction(),
                &mut self.rng,
            ),
        }
        self.time += self.options.time_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, CellState};
    use crate::color::Srgb;
    use crate::palette::{Palette, Tone};
    use crate::preprocess::{GridSize, ImageSample, ResampleOptions};

    fn midpoint_cells(w: usize, h: usize) -> CellBuffer {
        let palette = Palette::default();
        let mid = palette.dark().lerp(palette.accent(), 0.5);
        let sample = ImageSample::solid(mid, w, h).unwrap();
        classify(&sample, GridSize::new(w, h), &ResampleOptions::new(), &palette)
    }

    #[test]
    fn test_from_index() {
        assert_eq!(Algorithm::from_index(0), Algorithm::Static);
        assert_eq!(Algorithm::from_index(1), Algorithm::Random);
        assert_eq!(Algorithm::from_index(2), Algorithm::Wave);
        assert_eq!(Algorithm::from_index(-1), Algorithm::Random);
        assert_eq!(Algorithm::from_index(3), Algorithm::Random);
        assert!(!Algorithm::is_valid_index(3));
        for a in [Algorithm::Static, Algorithm::Random, Algorithm::Wave] {
            assert_eq!(Algorithm::from_index(a.index()), a);
        }
    }

    #[test]
    fn test_static_step_is_a_no_op() {
        let mut cells = midpoint_cells(4, 4);
        let before = cells.clone();
        let mut animator = Animator::seeded(Algorithm::Static, AnimationOptions::new(), 1);
        for _ in 0..5 {
            animator.step(&mut cells);
        }
        assert_eq!(cells, before);
        assert_eq!(animator.time(), 0.0);
    }

    #[test]
    fn test_clock_advances_per_animated_step() {
        let mut cells = midpoint_cells(2, 2);
        let mut animator = Animator::seeded(Algorithm::Random, AnimationOptions::new(), 1);
        for _ in 0..10 {
            animator.step(&mut cells);
        }
        assert!((animator.time() - 0.16).abs() < 1e-5);
    }

    #[test]
    fn test_fixed_cells_never_change() {
        let palette = Palette::default();
        // left column black, right column accent, middle blended
        let pixels = vec![
            Srgb::BLACK,
            palette.dark().lerp(palette.accent(), 0.5),
            palette.accent(),
        ];
        let sample = ImageSample::new(pixels, 3, 1).unwrap();
        let mut cells = classify(&sample, GridSize::new(3, 1), &ResampleOptions::new(), &palette);
        assert_eq!(cells.ambiguous_indices(), &[1]);

        let mut animator = Animator::seeded(Algorithm::Random, AnimationOptions::new(), 3);
        for _ in 0..200 {
            animator.step(&mut cells);
            assert_eq!(cells.state(0), CellState::Fixed(Tone::Dark));
            assert_eq!(cells.color(0), Tone::Dark);
            assert_eq!(cells.color(2), Tone::Accent);
            assert_eq!(&cells.rgba()[0..4], &[0, 0, 0, 255]);
            assert_eq!(&cells.rgba()[8..12], &[255, 140, 0, 255]);
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a_cells = midpoint_cells(8, 8);
        let mut b_cells = a_cells.clone();
        let mut a = Animator::seeded(Algorithm::Wave, AnimationOptions::new().chaos(50), 42);
        let mut b = Animator::seeded(Algorithm::Wave, AnimationOptions::new().chaos(50), 42);
        for _ in 0..20 {
            a.step(&mut a_cells);
            b.step(&mut b_cells);
            assert_eq!(a_cells.rgba(), b_cells.rgba());
        }
    }
}
