//! Palette types and utilities
//!
//! This module provides the two-tone [`Palette`], the [`Tone`] selector and
//! error types for parsing and validation.

mod error;
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, Tone};
