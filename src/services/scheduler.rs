use cell_dither::LoadedEngine;
use std::time::{Duration, Instant};

use crate::error::SurfaceError;
use crate::services::shutdown::RunFlag;
use crate::surface::{DesktopSurface, SurfaceStatus};

const REPORT_WINDOW: Duration = Duration::from_secs(1);

/// Monotonic time source for the frame loop
pub trait Clock {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;

    fn sleep(&self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Frame cap, 0 = unlimited
    pub max_fps: u32,
    /// Log achieved fps once per second
    pub report_timing: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            max_fps: 60,
            report_timing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The run flag was cleared (signal or caller)
    Cancelled,
    /// The surface reported it was closed
    SurfaceClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub reason: StopReason,
}

/// Decision for one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameGate {
    /// Render now; `elapsed` is the time since the previous frame
    Render { elapsed: Duration },
    /// Sleep this long before checking again
    Wait(Duration),
}

/// Decide whether a frame is due
pub fn frame_gate(max_fps: u32, elapsed: Duration) -> FrameGate {
    if max_fps == 0 {
        return FrameGate::Render { elapsed };
    }
    let target = Duration::from_secs(1) / max_fps;
    if elapsed >= target {
        FrameGate::Render { elapsed }
    } else {
        FrameGate::Wait(target - elapsed)
    }
}

/// Counts frames over windows of at least one second
#[derive(Debug, Default, Clone, Copy)]
pub struct FpsCounter {
    frames: u32,
    window: Duration,
}

impl FpsCounter {
    /// Record a frame; returns the frame count once a window completes
    pub fn record(&mut self, elapsed: Duration) -> Option<u32> {
        self.frames += 1;
        self.window += elapsed;
        if self.window >= REPORT_WINDOW {
            let frames = self.frames;
            *self = Self::default();
            Some(frames)
        } else {
            None
        }
    }
}

/// Drives the animator at a bounded rate and hands every frame to a surface
pub struct FrameScheduler<C: Clock = SystemClock> {
    options: SchedulerOptions,
    clock: C,
    state: SchedulerState,
}

impl FrameScheduler<SystemClock> {
    pub fn new(options: SchedulerOptions) -> Self {
        Self::with_clock(options, SystemClock::new())
    }
}

impl<C: Clock> FrameScheduler<C> {
    pub fn with_clock(options: SchedulerOptions, clock: C) -> Self {
        Self {
            options,
            clock,
            state: SchedulerState::Stopped,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run until `flag` is cleared or the surface closes.
    ///
    /// The surface is released on every exit path, including presentation
    /// errors.
    pub fn run(
        &mut self,
        engine: &mut LoadedEngine,
        surface: &mut dyn DesktopSurface,
        flag: &RunFlag,
    ) -> Result<RunSummary, SurfaceError> {
        self.state = SchedulerState::Running;
        tracing::debug!(
            surface = surface.name(),
            max_fps = self.options.max_fps,
            "Frame loop started"
        );

        let result = self.frame_loop(engine, surface, flag);

        self.state = SchedulerState::Stopping;
        surface.release();
        self.state = SchedulerState::Stopped;

        if let Ok(summary) = &result {
            tracing::info!(frames = summary.frames, reason = ?summary.reason, "Frame loop stopped");
        }
        result
    }

    fn frame_loop(
        &mut self,
        engine: &mut LoadedEngine,
        surface: &mut dyn DesktopSurface,
        flag: &RunFlag,
    ) -> Result<RunSummary, SurfaceError> {
        let mut frames = 0u64;
        let mut fps = FpsCounter::default();
        let mut last_frame = self.clock.now();

        loop {
            if !flag.is_running() {
                return Ok(RunSummary {
                    frames,
                    reason: StopReason::Cancelled,
                });
            }
            if surface.poll_events() == SurfaceStatus::Closed {
                return Ok(RunSummary {
                    frames,
                    reason: StopReason::SurfaceClosed,
                });
            }

            let now = self.clock.now();
            match frame_gate(self.options.max_fps, now.saturating_sub(last_frame)) {
                FrameGate::Render { elapsed } => {
                    engine.next_frame();
                    surface.present(engine.cells())?;
                    last_frame = now;
                    frames += 1;
                    tracing::trace!(frame = frames, "Presented frame");

                    if self.options.report_timing {
                        if let Some(count) = fps.record(elapsed) {
                            tracing::info!(fps = count, "Frame rate");
                        }
                    }
                }
                FrameGate::Wait(remaining) => self.clock.sleep(remaining),
            }
        }
    }
}
