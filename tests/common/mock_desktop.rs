//! Desktop integration that only counts calls.

use live_dither::services::DesktopConfig;

#[derive(Debug, Default)]
pub struct RecordingDesktop {
    pub prepared: u32,
    pub restored: u32,
}

impl DesktopConfig for RecordingDesktop {
    fn prepare(&mut self) {
        self.prepared += 1;
    }

    fn restore(&mut self) {
        self.restored += 1;
    }
}
