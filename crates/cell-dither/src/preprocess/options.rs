//! Resampling options and grid geometry.

/// Configuration for turning a source image into per-cell samples.
///
/// # Example
///
/// ```
/// use cell_dither::ResampleOptions;
///
/// let options = ResampleOptions::new().threshold(40);
/// assert_eq!(options.threshold, 40);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResampleOptions {
    /// Brightness cutoff on the 0..=255 scale.
    ///
    /// Samples whose luma falls below `threshold / 255` are forced to pure
    /// black before classification. `0` disables the cutoff.
    pub threshold: u8,
}

impl ResampleOptions {
    /// Options with the threshold disabled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the brightness threshold.
    #[inline]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Logical output resolution in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    /// Number of cells per row
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl GridSize {
    /// A grid of `width` x `height` cells, each dimension at least 1.
    #[inline]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Grid covering a `screen_width` x `screen_height` surface with square
    /// cells of `cell_size` pixels.
    ///
    /// Uses integer division, so a trailing partial cell is dropped.
    /// `cell_size` is clamped to at least 1.
    ///
    /// ```
    /// use cell_dither::GridSize;
    ///
    /// let grid = GridSize::from_screen(1920, 1080, 4);
    /// assert_eq!((grid.width, grid.height), (480, 270));
    /// ```
    #[inline]
    pub fn from_screen(screen_width: usize, screen_height: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        Self::new(screen_width / cell_size, screen_height / cell_size)
    }

    /// Total number of cells.
    #[inline]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}
