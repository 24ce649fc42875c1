//! Color type and conversion utilities
//!
//! The engine works on display-encoded sRGB samples in 0.0..=1.0. Gamma
//! correct blending is not performed: both palette distances and the
//! luma threshold operate on the encoded values.
//!
//! # Example
//!
//! ```
//! use cell_dither::Srgb;
//!
//! let sample = Srgb::from_u8(160, 88, 0);
//! let accent: Srgb = "#FF8C00".parse().unwrap();
//! assert!(sample.distance(accent) < sample.distance(Srgb::BLACK));
//! ```

mod srgb;

pub use srgb::Srgb;
