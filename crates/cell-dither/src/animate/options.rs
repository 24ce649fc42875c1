//! Animation options.

/// Fixed animation clock increment per frame, in seconds-equivalent.
pub const DEFAULT_TIME_STEP: f32 = 0.016;

/// Largest accepted chaos value.
pub const MAX_CHAOS: u8 = 100;

/// Configuration for the [`Animator`](super::Animator).
///
/// # Example
///
/// ```
/// use cell_dither::AnimationOptions;
///
/// let options = AnimationOptions::new().chaos(250);
/// assert_eq!(options.chaos, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationOptions {
    /// Share of wave mode replaced by per-cell noise, 0..=100.
    ///
    /// Default: `10`
    pub chaos: u8,

    /// Amount the animation clock advances per animated frame.
    ///
    /// The clock is frame-driven rather than wall-clock driven, so the wave
    /// speed scales with the achieved frame rate.
    ///
    /// Default: `0.016`
    pub time_step: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            chaos: 10,
            time_step: DEFAULT_TIME_STEP,
        }
    }
}

impl AnimationOptions {
    /// Options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set chaos, clamped to `0..=100`.
    #[inline]
    pub fn chaos(mut self, chaos: u8) -> Self {
        self.chaos = chaos.min(MAX_CHAOS);
        self
    }

    /// Set the clock increment per frame.
    ///
    /// Negative or non-finite values are replaced by the default.
    #[inline]
    pub fn time_step(mut self, step: f32) -> Self {
        self.time_step = if step.is_finite() && step >= 0.0 {
            step
        } else {
            DEFAULT_TIME_STEP
        };
        self
    }

    /// Chaos as a blend fraction, 0.0..=1.0.
    #[inline]
    pub fn chaos_fraction(&self) -> f32 {
        f32::from(self.chaos.min(MAX_CHAOS)) / 100.0
    }
}
