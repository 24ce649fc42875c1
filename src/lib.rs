//! live-dither - animated two-tone desktop background
//!
//! Loads an image, classifies it into a grid of dark, accent and ambiguous
//! cells with [`cell_dither`], and re-renders the ambiguous cells every
//! frame onto a desktop surface. This library exposes modules for
//! integration testing.

pub mod app;
pub mod error;
pub mod models;
pub mod services;
pub mod surface;
