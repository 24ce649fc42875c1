//! In-memory surface and clock for driving the frame scheduler.

use cell_dither::{CellBuffer, Tone};
use std::cell::{Cell, RefCell};
use std::time::Duration;

use live_dither::error::SurfaceError;
use live_dither::services::{Clock, RunFlag};
use live_dither::surface::{DesktopSurface, SurfaceStatus};

/// Records every presented frame.
///
/// Reports [`SurfaceStatus::Closed`] once `close_after` frames were
/// presented, and can clear a [`RunFlag`] or fail at a given frame.
#[derive(Default)]
pub struct MockSurface {
    pub width: usize,
    pub height: usize,
    pub frames: Vec<Vec<Tone>>,
    pub polls: u64,
    pub released: u32,
    close_after: Option<usize>,
    cancel_after: Option<(usize, RunFlag)>,
    fail_at: Option<usize>,
}

impl MockSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn close_after(mut self, frames: usize) -> Self {
        self.close_after = Some(frames);
        self
    }

    pub fn cancel_after(mut self, frames: usize, flag: RunFlag) -> Self {
        self.cancel_after = Some((frames, flag));
        self
    }

    /// Fail the `frame`-th present (0-based)
    pub fn fail_at(mut self, frame: usize) -> Self {
        self.fail_at = Some(frame);
        self
    }
}

impl DesktopSurface for MockSurface {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn present(&mut self, cells: &CellBuffer) -> Result<(), SurfaceError> {
        if self.fail_at == Some(self.frames.len()) {
            return Err(SurfaceError::Unavailable("mock failure".to_string()));
        }
        self.frames.push(cells.colors().to_vec());
        if let Some((after, flag)) = &self.cancel_after {
            if self.frames.len() >= *after {
                flag.stop();
            }
        }
        Ok(())
    }

    fn poll_events(&mut self) -> SurfaceStatus {
        self.polls += 1;
        match self.close_after {
            Some(n) if self.frames.len() >= n => SurfaceStatus::Closed,
            _ => SurfaceStatus::Open,
        }
    }

    fn release(&mut self) {
        self.released += 1;
    }
}

/// Clock that only moves when slept on, or by `tick` on every read
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Duration>,
    tick: Duration,
    pub sleeps: RefCell<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticking(tick: Duration) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    pub fn slept(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.tick);
        now
    }

    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.now.set(self.now.get() + duration);
    }
}
