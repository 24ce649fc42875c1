pub mod desktop_config;
pub mod image_loader;
pub mod scheduler;
pub mod shutdown;

pub use desktop_config::{
    CommandRunner, DesktopConfig, DesktopGuard, NoDesktopConfig, SystemRunner, Xfconf,
};
pub use image_loader::load_image;
pub use scheduler::{
    Clock, FrameScheduler, RunSummary, SchedulerOptions, SchedulerState, StopReason, SystemClock,
};
pub use shutdown::{listen_for_signals, RunFlag};
