//! Public API for the cell-dither crate.
//!
//! This module provides the high-level API: the [`DitherEngine`] builder,
//! the [`LoadedEngine`] it produces and the unified [`EngineError`].

mod builder;
mod error;

pub use builder::{DitherEngine, LoadedEngine};
pub use error::EngineError;
