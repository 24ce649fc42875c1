use cell_dither::{expand_into, CellBuffer, PixelLayout};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::{DesktopSurface, SurfaceStatus};
use crate::error::SurfaceError;

const LATEST_FILE: &str = "latest.png";

/// Headless surface that writes frames as PNG files.
///
/// Every `every`-th presented frame is written. With a frame limit each
/// frame gets its own `<dir>/frame-NNNNNN.png` and the surface reports
/// [`SurfaceStatus::Closed`] once that many frames were presented. Without
/// one, `<dir>/latest.png` is overwritten in place.
pub struct SnapshotSurface {
    dir: PathBuf,
    width: usize,
    height: usize,
    cell_size: usize,
    every: u32,
    frame_limit: u64,
    presented: u64,
    written: u64,
    last_written: Option<PathBuf>,
    frame: Vec<u8>,
}

impl SnapshotSurface {
    /// Create the output directory and a surface of the given virtual size
    pub fn create(
        dir: impl AsRef<Path>,
        width: usize,
        height: usize,
        cell_size: usize,
    ) -> Result<Self, SurfaceError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        tracing::info!(dir = %dir.display(), width, height, "Snapshot surface ready");

        Ok(Self {
            dir,
            width: width.max(1),
            height: height.max(1),
            cell_size: cell_size.max(1),
            every: 1,
            frame_limit: 0,
            presented: 0,
            written: 0,
            last_written: None,
            frame: Vec::new(),
        })
    }

    /// Write every Nth frame (at least 1)
    pub fn every(mut self, every: u32) -> Self {
        self.every = every.max(1);
        self
    }

    /// Close after `limit` frames, 0 for no limit
    pub fn frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = limit;
        self
    }

    /// Number of frames presented so far
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Number of PNG writes so far
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the most recent write
    pub fn last_written(&self) -> Option<&Path> {
        self.last_written.as_deref()
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        if self.frame_limit == 0 {
            self.dir.join(LATEST_FILE)
        } else {
            self.dir.join(format!("frame-{index:06}.png"))
        }
    }
}

impl DesktopSurface for SnapshotSurface {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, cells: &CellBuffer) -> Result<(), SurfaceError> {
        let index = self.presented;
        self.presented += 1;
        if index % u64::from(self.every) != 0 {
            return Ok(());
        }

        expand_into(
            cells,
            self.cell_size,
            self.width,
            self.height,
            PixelLayout::Rgba,
            &mut self.frame,
        );
        let path = self.frame_path(index);
        write_png(&path, self.width, self.height, &self.frame)?;
        tracing::trace!(path = %path.display(), "Wrote snapshot");
        self.written += 1;
        self.last_written = Some(path);
        Ok(())
    }

    fn poll_events(&mut self) -> SurfaceStatus {
        if self.frame_limit > 0 && self.presented >= self.frame_limit {
            SurfaceStatus::Closed
        } else {
            SurfaceStatus::Open
        }
    }

    fn release(&mut self) {}
}

/// Encode an RGBA8 buffer as a PNG file
pub fn write_png(
    path: &Path,
    width: usize,
    height: usize,
    rgba: &[u8],
) -> Result<(), SurfaceError> {
    let expected = width * height * 4;
    if rgba.len() != expected {
        return Err(SurfaceError::FrameSize {
            expected,
            actual: rgba.len(),
        });
    }

    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder
        .write_header()
        .map_err(|e| SurfaceError::PngEncode(e.to_string()))?;
    writer
        .write_image_data(rgba)
        .map_err(|e| SurfaceError::PngEncode(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| SurfaceError::PngEncode(e.to_string()))?;
    Ok(())
}
