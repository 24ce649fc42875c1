//! Common test infrastructure for live-dither integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod fixtures;
pub mod mock_desktop;
pub mod mock_surface;

pub use assertions::*;
pub use mock_desktop::RecordingDesktop;
pub use mock_surface::{ManualClock, MockSurface};
