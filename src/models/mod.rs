pub mod config;

pub use config::{AppConfig, CliOverrides, Settings, SurfaceKind, CONFIG_ENV};
