//! DitherEngine builder, the primary entry point for the crate.
//!
//! [`DitherEngine`] holds configuration only. [`DitherEngine::load`]
//! classifies an image once and returns a [`LoadedEngine`] that owns the
//! cell buffer and the animator for the rest of the run.

use crate::animate::{Algorithm, AnimationOptions, Animator};
use crate::classify::classify;
use crate::output::{expand_into, CellBuffer, ClassificationStats, PixelLayout};
use crate::palette::Palette;
use crate::preprocess::{GridSize, ImageSample, ResampleOptions};

use super::EngineError;

/// Two-color dithering engine configuration.
///
/// # Design
///
/// - Constructor requires a [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`load()`](Self::load) takes `&self`, so one configuration can load
///   several images
///
/// # Example
///
/// ```
/// use cell_dither::{Algorithm, DitherEngine, GridSize, ImageSample, Palette};
///
/// let palette = Palette::default();
/// let mid = palette.dark().lerp(palette.accent(), 0.5);
/// let sample = ImageSample::solid(mid, 8, 8).unwrap();
///
/// let mut engine = DitherEngine::new(palette)
///     .algorithm(Algorithm::Random)
///     .seed(1)
///     .load(&sample, GridSize::new(4, 4));
///
/// assert_eq!(engine.stats().ambiguous, 16);
/// assert_eq!(engine.next_frame().len(), 4 * 4 * 4);
/// ```
#[derive(Debug, Clone)]
pub struct DitherEngine {
    palette: Palette,
    algorithm: Algorithm,
    resample: ResampleOptions,
    animation: AnimationOptions,
    seed: Option<u64>,
}

impl DitherEngine {
    /// Engine with the given palette, wave animation, threshold 0 and
    /// default chaos.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            algorithm: Algorithm::default(),
            resample: ResampleOptions::new(),
            animation: AnimationOptions::new(),
            seed: None,
        }
    }

    /// Engine for a palette given as two hex strings.
    pub fn from_hex(dark: &str, accent: &str) -> Result<Self, EngineError> {
        Ok(Self::new(Palette::from_hex(dark, accent)?))
    }

    /// Set the animation algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the darkness cutoff, 0..=255. Samples whose luma is below
    /// `threshold / 255` are treated as pure black.
    #[inline]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.resample = self.resample.threshold(threshold);
        self
    }

    /// Set wave-mode chaos, clamped to 0..=100.
    #[inline]
    pub fn chaos(mut self, chaos: u8) -> Self {
        self.animation = self.animation.chaos(chaos);
        self
    }

    /// Set the animation clock increment per frame.
    #[inline]
    pub fn time_step(mut self, step: f32) -> Self {
        self.animation = self.animation.time_step(step);
        self
    }

    /// Use a fixed noise seed instead of entropy.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured palette.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Classify `sample` on `grid` and prepare the animator.
    ///
    /// Cannot fail: the sample is already validated and every grid has at
    /// least one cell. See [`load_rgb8`](Self::load_rgb8) for raw input.
    pub fn load(&self, sample: &ImageSample, grid: GridSize) -> LoadedEngine {
        let cells = classify(sample, grid, &self.resample, &self.palette);
        let animator = match self.seed {
            Some(seed) => Animator::seeded(self.algorithm, self.animation, seed),
            None => Animator::new(self.algorithm, self.animation),
        };
        LoadedEngine {
            palette: self.palette.clone(),
            cells,
            animator,
        }
    }

    /// Validate packed RGB8 bytes and [`load`](Self::load) them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Sample`] for empty images or a byte count other
    /// than `width * height * 3`.
    pub fn load_rgb8(
        &self,
        bytes: &[u8],
        width: usize,
        height: usize,
        grid: GridSize,
    ) -> Result<LoadedEngine, EngineError> {
        let sample = ImageSample::from_rgb8(bytes, width, height)?;
        Ok(self.load(&sample, grid))
    }
}

/// A classified image plus its animator.
#[derive(Debug, Clone)]
pub struct LoadedEngine {
    palette: Palette,
    cells: CellBuffer,
    animator: Animator,
}

impl LoadedEngine {
    /// Advance one frame and return the grid-resolution RGBA buffer.
    ///
    /// In static mode this returns the unchanged buffer.
    pub fn next_frame(&mut self) -> &[u8] {
        self.animator.step(&mut self.cells);
        self.cells.rgba()
    }

    /// Current grid-resolution RGBA buffer without advancing.
    #[inline]
    pub fn frame(&self) -> &[u8] {
        self.cells.rgba()
    }

    /// Expand the current frame to screen resolution into `out`.
    pub fn expand_into(
        &self,
        cell_size: usize,
        screen_width: usize,
        screen_height: usize,
        layout: PixelLayout,
        out: &mut Vec<u8>,
    ) {
        expand_into(&self.cells, cell_size, screen_width, screen_height, layout, out);
    }

    /// Classified cells.
    #[inline]
    pub fn cells(&self) -> &CellBuffer {
        &self.cells
    }

    /// Classification counts.
    #[inline]
    pub fn stats(&self) -> ClassificationStats {
        self.cells.stats()
    }

    /// Animator state.
    #[inline]
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Palette used for classification.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Grid dimensions.
    #[inline]
    pub fn grid(&self) -> GridSize {
        self.cells.grid()
    }
}
