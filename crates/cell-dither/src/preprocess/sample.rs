//! Validated source image.

use std::fmt;

use crate::color::Srgb;

/// Error type for building an [`ImageSample`].
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// Width or height is zero, or there are no pixels at all
    Empty {
        /// Reported width
        width: usize,
        /// Reported height
        height: usize,
    },
    /// Pixel count does not match `width * height`
    LengthMismatch {
        /// Expected number of pixels (or bytes for RGB8 input)
        expected: usize,
        /// Number actually supplied
        actual: usize,
    },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::Empty { width, height } => {
                write!(f, "image is empty ({}x{})", width, height)
            }
            SampleError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "image data length mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SampleError {}

/// Immutable source image: dimensions plus row-major sRGB samples.
///
/// Construction is the only place that can fail; every later stage can rely
/// on `width >= 1`, `height >= 1` and `pixels.len() == width * height`.
///
/// # Example
///
/// ```
/// use cell_dither::ImageSample;
///
/// // 2x1 image: black, orange
/// let bytes = [0, 0, 0, 255, 140, 0];
/// let sample = ImageSample::from_rgb8(&bytes, 2, 1).unwrap();
/// assert_eq!(sample.width(), 2);
/// assert_eq!(sample.pixel(1, 0).to_bytes(), [255, 140, 0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pixels: Vec<Srgb>,
    width: usize,
    height: usize,
}

impl ImageSample {
    /// Wrap already-normalized pixels.
    pub fn new(pixels: Vec<Srgb>, width: usize, height: usize) -> Result<Self, SampleError> {
        if width == 0 || height == 0 || pixels.is_empty() {
            return Err(SampleError::Empty { width, height });
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(SampleError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Build from packed 8-bit RGB triples, normalizing to 0.0..=1.0.
    pub fn from_rgb8(bytes: &[u8], width: usize, height: usize) -> Result<Self, SampleError> {
        if width == 0 || height == 0 || bytes.is_empty() {
            return Err(SampleError::Empty { width, height });
        }
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(SampleError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|px| Srgb::from_u8(px[0], px[1], px[2]))
            .collect();
        Self::new(pixels, width, height)
    }

    /// A `width` x `height` image filled with one color.
    pub fn solid(color: Srgb, width: usize, height: usize) -> Result<Self, SampleError> {
        Self::new(vec![color; width * height], width, height)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Srgb {
        self.pixels[y * self.width + x]
    }
}
