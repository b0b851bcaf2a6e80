//! Fixed-cadence frame renderer
//!
//! Draws at most one frame per refresh interval. If the interval has passed
//! but no frame is queued, the timer is left running so the next frame is
//! drawn as soon as it arrives instead of waiting out another interval.

use voxel_core::render::draw_frame;
use voxel_core::timing::Interval;
use voxel_hal::StripDriver;

use super::shared::{SharedSlave, VoxelFrame};

/// Pops frames from the shared ring and draws them
pub struct RenderScheduler {
    timer: Interval,
    /// Frame being drawn, owned here once dequeued
    frame: VoxelFrame,
    /// Height the strip was last started with
    strip_y_size: Option<usize>,
    last_frame_id: Option<u16>,
}

impl RenderScheduler {
    pub fn new(refresh_interval_us: u32) -> Self {
        Self {
            timer: Interval::new(refresh_interval_us),
            frame: VoxelFrame::EMPTY,
            strip_y_size: None,
            last_frame_id: None,
        }
    }

    /// Elapsed time since the last drawn frame (µs)
    pub fn elapsed_us(&self) -> u32 {
        self.timer.elapsed_us()
    }

    /// Id of the last drawn frame
    pub fn last_frame_id(&self) -> Option<u16> {
        self.last_frame_id
    }

    /// Record the strip layout configured outside the scheduler
    pub fn set_strip_y_size(&mut self, y_size: usize) {
        self.strip_y_size = Some(y_size);
    }

    /// Advance by `dt_us` and draw a frame if one is due
    ///
    /// Returns `true` if a frame was drawn.
    pub fn run<S: StripDriver>(&mut self, dt_us: u32, shared: &SharedSlave, strip: &mut S) -> bool {
        self.timer.accumulate(dt_us);
        if !self.timer.is_due() {
            return false;
        }
        if !shared.pop_frame(&mut self.frame) {
            return false;
        }

        let geometry = self.frame.geometry();
        if self.strip_y_size != Some(geometry.y_size()) {
            debug!("Restarting strip for y size {}", geometry.y_size());
            strip.begin(geometry.leds_per_strip());
            self.strip_y_size = Some(geometry.y_size());
        }

        draw_frame(geometry, self.frame.payload(), strip);
        strip.show();
        self.last_frame_id = Some(self.frame.id());
        self.timer.reset();
        true
    }
}
