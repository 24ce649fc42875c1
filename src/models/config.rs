use cell_dither::{Algorithm, Palette, Srgb};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Environment variable naming a YAML config file
pub const CONFIG_ENV: &str = "LIVE_DITHER_CONFIG";

/// Which presentation surface to drive
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Native desktop window when available, snapshots otherwise
    #[default]
    Auto,
    /// X11 desktop window (requires the `x11` feature)
    X11,
    /// Window behind the Windows desktop icons
    Windows,
    /// PNG files written to a directory
    Snapshot,
}

impl std::str::FromStr for SurfaceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SurfaceKind::Auto),
            "x11" => Ok(SurfaceKind::X11),
            "windows" => Ok(SurfaceKind::Windows),
            "snapshot" => Ok(SurfaceKind::Snapshot),
            other => Err(format!(
                "unknown surface '{other}' (auto, x11, windows, snapshot)"
            )),
        }
    }
}

/// Application configuration as read from config.yaml and the command line.
///
/// Numeric fields are kept wide so that out-of-range input survives parsing
/// and can be clamped with a warning by [`AppConfig::clamped`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Background image (PNG or JPEG)
    pub image: PathBuf,

    /// 0 static, 1 random, 2 wave
    pub algorithm: i64,

    /// Darkness cutoff, 0..=255
    pub threshold: i64,

    /// Screen pixels per cell edge
    pub cell_size: i64,

    /// Frame rate cap, 0 = unlimited
    pub max_fps: i64,

    /// Log the achieved frame rate once per second
    pub report_timing: bool,

    /// Wave noise blend, 0..=100
    pub chaos: i64,

    /// Accent color as hex
    pub accent: String,

    /// Presentation surface
    pub surface: SurfaceKind,

    /// Output directory of the snapshot surface
    pub snapshot_dir: PathBuf,

    /// Write every Nth presented frame
    pub snapshot_every: u32,

    /// Stop after this many frames, each kept as its own file.
    /// 0 = run until cancelled, overwriting `latest.png`.
    pub snapshot_frames: u64,

    /// Virtual screen size for the snapshot surface and `classify`
    pub screen_width: u32,
    pub screen_height: u32,

    /// Fixed animation seed
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from("bg.jpg"),
            algorithm: 2,
            threshold: 40,
            cell_size: 1,
            max_fps: 60,
            report_timing: true,
            chaos: 10,
            accent: "#FF8C00".to_string(),
            surface: SurfaceKind::Auto,
            snapshot_dir: PathBuf::from("snapshots"),
            snapshot_every: 60,
            snapshot_frames: 0,
            screen_width: 1920,
            screen_height: 1080,
            seed: None,
        }
    }
}

/// Values given on the command line, applied over the file config
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOverrides {
    pub image: Option<PathBuf>,
    pub algorithm: Option<i64>,
    pub threshold: Option<i64>,
    pub cell_size: Option<i64>,
    pub max_fps: Option<i64>,
    pub profile: Option<i64>,
    pub chaos: Option<i64>,
    pub accent: Option<String>,
    pub surface: Option<SurfaceKind>,
    pub snapshot_dir: Option<PathBuf>,
    pub snapshot_frames: Option<u64>,
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from an explicit path or `LIVE_DITHER_CONFIG`.
    ///
    /// An explicit path that does not exist is an error. Every other read
    /// or parse failure is logged and the defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match std::env::var_os(CONFIG_ENV) {
                Some(value) => PathBuf::from(value),
                None => return Ok(Self::default()),
            },
        };

        Ok(Self::load_from_file(&path))
    }

    /// Read and parse a YAML file, falling back to defaults on failure
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml(&content).unwrap_or_else(|e| {
                tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse YAML; missing fields take their defaults
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        tracing::debug!(image = %config.image.display(), "Loaded configuration");
        Ok(config)
    }

    /// Overlay command line values
    pub fn apply(&mut self, overrides: &CliOverrides) {
        if let Some(image) = &overrides.image {
            self.image = image.clone();
        }
        if let Some(v) = overrides.algorithm {
            self.algorithm = v;
        }
        if let Some(v) = overrides.threshold {
            self.threshold = v;
        }
        if let Some(v) = overrides.cell_size {
            self.cell_size = v;
        }
        if let Some(v) = overrides.max_fps {
            self.max_fps = v;
        }
        if let Some(v) = overrides.profile {
            self.report_timing = v != 0;
        }
        if let Some(v) = overrides.chaos {
            self.chaos = v;
        }
        if let Some(accent) = &overrides.accent {
            self.accent = accent.clone();
        }
        if let Some(surface) = overrides.surface {
            self.surface = surface;
        }
        if let Some(dir) = &overrides.snapshot_dir {
            self.snapshot_dir = dir.clone();
        }
        if let Some(frames) = overrides.snapshot_frames {
            self.snapshot_frames = frames;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
    }

    /// Clamp every value into range, logging each adjustment at warn level
    pub fn clamped(&self) -> Settings {
        let index = i32::try_from(self.algorithm).ok();
        let algorithm = if let Some(index) = index.filter(|&i| Algorithm::is_valid_index(i)) {
            Algorithm::from_index(index)
        } else {
            tracing::warn!(
                value = self.algorithm,
                "Algorithm out of range (0..=2), using random"
            );
            Algorithm::Random
        };

        let threshold = clamp_logged("threshold", self.threshold, 0, 255) as u8;
        let cell_size = clamp_logged("cell_size", self.cell_size, 1, i64::from(u16::MAX)) as usize;
        let max_fps = clamp_logged("max_fps", self.max_fps, 0, i64::from(u16::MAX)) as u32;
        let chaos = clamp_logged("chaos", self.chaos, 0, 100) as u8;

        let palette = match self.accent.parse::<Srgb>() {
            Ok(accent) => match Palette::new(Srgb::BLACK, accent) {
                Ok(palette) => palette,
                Err(e) => {
                    tracing::warn!(%e, accent = %self.accent, "Unusable accent color, using default");
                    Palette::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, accent = %self.accent, "Invalid accent color, using default");
                Palette::default()
            }
        };

        let snapshot_every = if self.snapshot_every == 0 {
            tracing::warn!("snapshot_every must be at least 1, using 1");
            1
        } else {
            self.snapshot_every
        };

        Settings {
            image: self.image.clone(),
            algorithm,
            threshold,
            cell_size,
            max_fps,
            report_timing: self.report_timing,
            chaos,
            palette,
            surface: self.surface,
            snapshot_dir: self.snapshot_dir.clone(),
            snapshot_every,
            snapshot_frames: self.snapshot_frames,
            screen_width: self.screen_width.max(1) as usize,
            screen_height: self.screen_height.max(1) as usize,
            seed: self.seed,
        }
    }
}

fn clamp_logged(field: &'static str, value: i64, min: i64, max: i64) -> i64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(field, value, clamped, "Configuration value out of range, clamped");
    }
    clamped
}

/// Validated configuration, every value in range
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub image: PathBuf,
    pub algorithm: Algorithm,
    pub threshold: u8,
    pub cell_size: usize,
    pub max_fps: u32,
    pub report_timing: bool,
    pub chaos: u8,
    pub palette: Palette,
    pub surface: SurfaceKind,
    pub snapshot_dir: PathBuf,
    pub snapshot_every: u32,
    pub snapshot_frames: u64,
    pub screen_width: usize,
    pub screen_height: usize,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        AppConfig::default().clamped()
    }
}
