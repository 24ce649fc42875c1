//! Unified error type for the cell-dither public API.
//!
//! [`EngineError`] wraps every error the crate can produce so application
//! code can propagate with `?`.

use crate::palette::{PaletteError, ParseColorError};
use crate::preprocess::SampleError;
use std::fmt;

/// Unified error type for the cell-dither public API.
///
/// # Example
///
/// ```
/// use cell_dither::{DitherEngine, EngineError};
///
/// fn engine() -> Result<DitherEngine, EngineError> {
///     DitherEngine::from_hex("#000000", "#FF8C00")
/// }
/// assert!(engine().is_ok());
/// ```
#[derive(Debug)]
pub enum EngineError {
    /// Source image has no pixels or a buffer of the wrong size
    Sample(SampleError),
    /// Palette colors are unusable
    Palette(PaletteError),
    /// Color parsing error (invalid hex string)
    ParseColor(ParseColorError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Sample(err) => write!(f, "image error: {}", err),
            EngineError::Palette(err) => write!(f, "palette error: {}", err),
            EngineError::ParseColor(err) => write!(f, "color parse error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Sample(err) => Some(err),
            EngineError::Palette(err) => Some(err),
            EngineError::ParseColor(err) => Some(err),
        }
    }
}

impl From<SampleError> for EngineError {
    fn from(err: SampleError) -> Self {
        EngineError::Sample(err)
    }
}

impl From<PaletteError> for EngineError {
    fn from(err: PaletteError) -> Self {
        EngineError::Palette(err)
    }
}

impl From<ParseColorError> for EngineError {
    fn from(err: ParseColorError) -> Self {
        EngineError::ParseColor(err)
    }
}
