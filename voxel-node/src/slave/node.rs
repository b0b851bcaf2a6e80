//! Slave main loop
//!
//! Each iteration pumps the serial link (delivering packets to the decoder),
//! lets the renderer draw a due frame, and emits a periodic heartbeat.
//! On boards where the serial framer runs from its receive interrupt, the
//! same [`FrameProtocolDecoder`] can be handed to that interrupt instead.

use voxel_core::config::{GeometryError, SlaveConfig};
use voxel_core::timing::Interval;
use voxel_hal::{SerialTransport, StripDriver};

use super::decoder::FrameProtocolDecoder;
use super::render::RenderScheduler;
use super::shared::SharedSlave;

/// One slave: serial input, frame pipeline and LED output
pub struct SlaveNode<'a, T, S>
where
    T: SerialTransport,
    S: StripDriver,
{
    serial: T,
    strip: S,
    shared: &'a SharedSlave,
    decoder: FrameProtocolDecoder<'a>,
    renderer: RenderScheduler,
    ping_timer: Interval,
}

impl<'a, T, S> SlaveNode<'a, T, S>
where
    T: SerialTransport,
    S: StripDriver,
{
    /// Bring up the node with the configured initial height
    ///
    /// Starts a fresh session on `shared` and blanks the strip.
    pub fn new(
        config: SlaveConfig,
        shared: &'a SharedSlave,
        serial: T,
        mut strip: S,
    ) -> Result<Self, GeometryError> {
        shared.reinit(config.initial_y_size)?;
        let geometry = shared.geometry();
        strip.begin(geometry.leds_per_strip());
        strip.show();

        let mut renderer = RenderScheduler::new(config.refresh_interval_us);
        renderer.set_strip_y_size(geometry.y_size());

        info!(
            "Slave {} ready, module y size {}",
            config.slave_id,
            geometry.y_size()
        );

        Ok(Self {
            serial,
            strip,
            shared,
            decoder: FrameProtocolDecoder::new(config.slave_id, shared),
            renderer,
            ping_timer: Interval::new(config.ping_interval_us),
        })
    }

    pub fn serial_mut(&mut self) -> &mut T {
        &mut self.serial
    }

    pub fn strip(&self) -> &S {
        &self.strip
    }

    /// One loop iteration
    ///
    /// Returns `true` if a frame was drawn.
    pub fn run(&mut self, dt_us: u32) -> bool {
        self.serial.poll(&self.decoder);
        if self.serial.overflowed() {
            warn!("Serial buffer overflow");
        }

        let drawn = self.renderer.run(dt_us, self.shared, &mut self.strip);

        if self.ping_timer.tick(dt_us) {
            info!("SLAVE_ID {}", self.decoder.slave_id());
        }

        drawn
    }
}
