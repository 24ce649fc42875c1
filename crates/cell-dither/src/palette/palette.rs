//! Two-tone palette and the distance-based accent probability.
//!
//! The engine only ever renders two colors: a dark base and an accent. A
//! source sample is placed on the line between them by comparing its
//! Euclidean RGB distance to each end.

use super::error::PaletteError;
use crate::color::Srgb;

/// Below this combined distance a sample counts as equidistant from both
/// palette entries and gets probability 0.5.
const MIN_TOTAL_DISTANCE: f32 = 1e-3;

/// One of the two output colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// The dark base color (black by default)
    Dark,
    /// The accent color (orange by default)
    Accent,
}

impl Tone {
    /// `Accent` when `accent` is true, `Dark` otherwise.
    #[inline]
    pub fn from_accent(accent: bool) -> Self {
        if accent {
            Tone::Accent
        } else {
            Tone::Dark
        }
    }
}

/// The fixed two-color palette.
///
/// Holds both colors as sRGB for distance math and as pre-packed RGBA bytes
/// for writing the output buffer, so per-frame updates are a 4-byte copy.
///
/// # Example
///
/// ```
/// use cell_dither::{Palette, Srgb};
///
/// let palette = Palette::default();
/// assert_eq!(palette.accent().to_bytes(), [255, 140, 0]);
///
/// // A sample exactly on the accent color is certain to be accent
/// let p = palette.accent_probability(palette.accent());
/// assert!((p - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    dark: Srgb,
    accent: Srgb,
    dark_rgba: [u8; 4],
    accent_rgba: [u8; 4],
}

impl Palette {
    /// Default accent color, `#FF8C00`.
    pub const DEFAULT_ACCENT: Srgb = Srgb::new(1.0, 0.549, 0.0);

    /// Create a palette from a dark and an accent color.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::IdenticalColors`] when both colors encode to
    /// the same bytes.
    pub fn new(dark: Srgb, accent: Srgb) -> Result<Self, PaletteError> {
        let dark_bytes = dark.to_bytes();
        let accent_bytes = accent.to_bytes();
        if dark_bytes == accent_bytes {
            return Err(PaletteError::IdenticalColors { color: dark_bytes });
        }

        Ok(Self {
            dark,
            accent,
            dark_rgba: rgba(dark_bytes),
            accent_rgba: rgba(accent_bytes),
        })
    }

    /// Create a palette from two hex strings (see [`Srgb`]'s `FromStr`).
    ///
    /// ```
    /// use cell_dither::{Palette, Tone};
    ///
    /// let palette = Palette::from_hex("#000", "#FF8C00").unwrap();
    /// assert_eq!(palette.rgba(Tone::Accent), Palette::default().rgba(Tone::Accent));
    /// ```
    pub fn from_hex(dark: &str, accent: &str) -> Result<Self, PaletteError> {
        let dark: Srgb = dark.parse()?;
        let accent: Srgb = accent.parse()?;
        Self::new(dark, accent)
    }

    /// The dark color.
    #[inline]
    pub fn dark(&self) -> Srgb {
        self.dark
    }

    /// The accent color.
    #[inline]
    pub fn accent(&self) -> Srgb {
        self.accent
    }

    /// The color for `tone`.
    #[inline]
    pub fn color(&self, tone: Tone) -> Srgb {
        match tone {
            Tone::Dark => self.dark,
            Tone::Accent => self.accent,
        }
    }

    /// Output buffer entry (RGBA, alpha 255) for `tone`.
    #[inline]
    pub fn rgba(&self, tone: Tone) -> [u8; 4] {
        match tone {
            Tone::Dark => self.dark_rgba,
            Tone::Accent => self.accent_rgba,
        }
    }

    /// Likelihood in 0.0..=1.0 that `sample` should render as the accent.
    ///
    /// Computed as `d_dark / (d_dark + d_accent)`, so 0.0 at the dark color,
    /// 1.0 at the accent and 0.5 anywhere equidistant. Returns 0.5 when the
    /// combined distance is too small to divide by.
    #[inline]
    pub fn accent_probability(&self, sample: Srgb) -> f32 {
        let dist_dark = sample.distance(self.dark);
        let dist_accent = sample.distance(self.accent);
        let total = dist_dark + dist_accent;
        if total > MIN_TOTAL_DISTANCE {
            (dist_dark / total).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let dark = Srgb::BLACK;
        let accent = Self::DEFAULT_ACCENT;
        Self {
            dark,
            accent,
            dark_rgba: rgba(dark.to_bytes()),
            accent_rgba: rgba(accent.to_bytes()),
        }
    }
}

#[inline]
fn rgba([r, g, b]: [u8; 3]) -> [u8; 4] {
    [r, g, b, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_bytes() {
        let palette = Palette::default();
        assert_eq!(palette.rgba(Tone::Dark), [0, 0, 0, 255]);
        assert_eq!(palette.rgba(Tone::Accent), [255, 140, 0, 255]);
        assert_eq!(palette.color(Tone::Dark), Srgb::BLACK);
    }

    #[test]
    fn test_identical_colors_rejected() {
        let c = Srgb::from_u8(10, 20, 30);
        let err = Palette::new(c, c).unwrap_err();
        assert_eq!(err, PaletteError::IdenticalColors { color: [10, 20, 30] });
    }

    #[test]
    fn test_from_hex_propagates_parse_error() {
        let err = Palette::from_hex("#000", "not-a-color").unwrap_err();
        assert!(matches!(err, PaletteError::ParseColor(_)));
    }

    #[test]
    fn test_probability_at_endpoints() {
        let palette = Palette::default();
        assert!(palette.accent_probability(Srgb::BLACK).abs() < 1e-6);
        assert!((palette.accent_probability(palette.accent()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_probability_at_midpoint() {
        let palette = Palette::default();
        let mid = palette.dark().lerp(palette.accent(), 0.5);
        assert!((palette.accent_probability(mid) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_probability_always_in_unit_range() {
        let palette = Palette::default();
        for r in (0..=255u16).step_by(15) {
            for g in (0..=255u16).step_by(15) {
                for b in (0..=255u16).step_by(15) {
                    let p = palette.accent_probability(Srgb::from_u8(r as u8, g as u8, b as u8));
                    assert!((0.0..=1.0).contains(&p), "p={p} for ({r},{g},{b})");
                }
            }
        }
    }

    #[test]
    fn test_tone_from_accent() {
        assert_eq!(Tone::from_accent(true), Tone::Accent);
        assert_eq!(Tone::from_accent(false), Tone::Dark);
    }
}
