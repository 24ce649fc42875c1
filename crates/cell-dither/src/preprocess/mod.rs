//! Source image validation and resampling onto the cell grid.
//!
//! # Processing Order
//!
//! 1. **Resample** (bilinear) - one color per grid cell
//! 2. **Threshold** - samples darker than the cutoff become pure black
//!
//! Thresholding happens after resampling so that the cutoff sees the same
//! blended value the classifier will see.
//!
//! # Example
//!
//! ```
//! use cell_dither::{resample_bilinear, GridSize, ImageSample, ResampleOptions, Srgb};
//!
//! let sample = ImageSample::solid(Srgb::from_u8(20, 20, 20), 8, 8).unwrap();
//! let cells = resample_bilinear(&sample, GridSize::new(4, 4), &ResampleOptions::new().threshold(40));
//!
//! assert_eq!(cells.len(), 16);
//! assert!(cells.iter().all(|&c| c == Srgb::BLACK));
//! ```

mod options;
mod resize;
mod sample;

pub use options::{GridSize, ResampleOptions};
pub use resize::{apply_threshold, resample_bilinear};
pub use sample::{ImageSample, SampleError};
