//! XFCE desktop background settings via `xfconf-query`.
//!
//! While the live background runs, xfdesktop is told to draw a transparent
//! background without an image. Restoring switches back to a solid color
//! with a zoomed image. Failures are logged and never propagated.

use std::process::{Command, Stdio};

const CHANNEL: &str = "xfce4-desktop";
const PROPERTY_MARKER: &str = "last-image";

/// xfdesktop `color-style` / `image-style` values
const COLOR_STYLE_SOLID: i32 = 0;
const COLOR_STYLE_TRANSPARENT: i32 = 3;
const IMAGE_STYLE_NONE: i32 = 0;
const IMAGE_STYLE_ZOOMED: i32 = 5;

/// Changes to the desktop environment made for the lifetime of a run
pub trait DesktopConfig {
    /// Apply the settings the live background needs
    fn prepare(&mut self);

    /// Put the previous settings back. Runs at most once per instance.
    fn restore(&mut self);
}

/// No desktop integration (snapshot surface, non-XFCE sessions)
#[derive(Debug, Default)]
pub struct NoDesktopConfig;

impl DesktopConfig for NoDesktopConfig {
    fn prepare(&mut self) {}

    fn restore(&mut self) {}
}

/// Prepares a [`DesktopConfig`] on creation and restores it when dropped,
/// so early returns and panics also put the desktop back
pub struct DesktopGuard<'a> {
    desktop: &'a mut dyn DesktopConfig,
}

impl<'a> DesktopGuard<'a> {
    pub fn new(desktop: &'a mut dyn DesktopConfig) -> Self {
        desktop.prepare();
        Self { desktop }
    }
}

impl Drop for DesktopGuard<'_> {
    fn drop(&mut self) {
        self.desktop.restore();
    }
}

/// Runs external commands, returning `(success, stdout)`
pub trait CommandRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> std::io::Result<(bool, String)>;
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[&str]) -> std::io::Result<(bool, String)> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;
        Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}

/// xfdesktop background settings for the first monitor/workspace that has
/// a `last-image` property
pub struct Xfconf<R: CommandRunner = SystemRunner> {
    runner: R,
    restored: bool,
}

impl Xfconf<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for Xfconf<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Xfconf<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            restored: false,
        }
    }

    /// Consume the wrapper and return the runner
    pub fn into_runner(self) -> R {
        self.runner
    }

    fn set_property(&mut self, suffix: &str, value: i32) {
        let listing = match self.runner.run("xfconf-query", &["-c", CHANNEL, "-l"]) {
            Ok((_, stdout)) => stdout,
            Err(e) => {
                tracing::warn!(%e, "xfconf-query not available, desktop settings unchanged");
                return;
            }
        };
        let Some(prefix) = property_prefix(&listing) else {
            tracing::debug!(suffix, "No xfdesktop background property found");
            return;
        };

        let property = format!("{prefix}{suffix}");
        let value = value.to_string();
        let set = self
            .runner
            .run("xfconf-query", &["-c", CHANNEL, "-p", &property, "-s", &value]);
        if matches!(set, Ok((true, _))) {
            return;
        }

        let create = self.runner.run(
            "xfconf-query",
            &["-c", CHANNEL, "-p", &property, "-n", "-t", "int", "-s", &value],
        );
        match create {
            Ok((true, _)) => {}
            Ok((false, _)) => tracing::warn!(property = %property, "Failed to set xfconf property"),
            Err(e) => tracing::warn!(%e, property = %property, "Failed to set xfconf property"),
        }
    }
}

impl<R: CommandRunner> DesktopConfig for Xfconf<R> {
    fn prepare(&mut self) {
        tracing::info!("Configuring xfdesktop for transparency");
        self.set_property("color-style", COLOR_STYLE_TRANSPARENT);
        self.set_property("image-style", IMAGE_STYLE_NONE);
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        tracing::info!("Restoring xfdesktop settings");
        self.set_property("color-style", COLOR_STYLE_SOLID);
        self.set_property("image-style", IMAGE_STYLE_ZOOMED);
        tracing::info!("Restored");
    }
}

/// Property path prefix from an `xfconf-query -l` listing: the first line
/// containing `last-image`, with that marker removed
pub fn property_prefix(listing: &str) -> Option<String> {
    listing
        .lines()
        .find(|line| line.contains(PROPERTY_MARKER))
        .map(|line| line.trim().replacen(PROPERTY_MARKER, "", 1))
        .filter(|prefix| !prefix.is_empty())
}
