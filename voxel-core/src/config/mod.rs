//! Compiled-in configuration
//!
//! Addresses, ports, geometry bounds, refresh rate and buffer sizes are fixed
//! at build time. Node-level knobs that tests need to vary are grouped in
//! [`MasterConfig`] and [`SlaveConfig`].

pub mod geometry;

pub use geometry::{GeometryError, VoxelModuleGeometry};

use core::net::Ipv4Addr;

use voxel_protocol::packet::FRAME_HEADER_SIZE;
use voxel_protocol::{MULTICAST_DISCOVERY_ADDR, UDP_DISCOVERY_PORT};

/// Strips per module (x axis)
pub const MODULE_X_SIZE: usize = 8;

/// Module depth (z axis)
pub const MODULE_Z_SIZE: usize = 8;

/// Largest module height (y axis) a welcome packet may request
pub const MAX_MODULE_Y_SIZE: usize = 16;

/// Module height used until the first welcome packet
pub const DEFAULT_MODULE_Y_SIZE: u8 = MODULE_X_SIZE as u8;

/// LEDs in the largest supported module
pub const MAX_LEDS_PER_MODULE: usize = MODULE_X_SIZE * MAX_MODULE_Y_SIZE * MODULE_Z_SIZE;

/// Bytes in the largest frame payload (RGB per voxel)
pub const MAX_FRAME_PAYLOAD: usize = 3 * MAX_LEDS_PER_MODULE;

/// Largest slave packet on the serial link
pub const MAX_SLAVE_PACKET_SIZE: usize = FRAME_HEADER_SIZE + MAX_FRAME_PAYLOAD;

/// Frames buffered between the receive path and the renderer
pub const FRAME_QUEUE_CAPACITY: usize = 6;

/// Target LED refresh rate
pub const REFRESH_RATE_HZ: u32 = 30;

/// Microseconds between rendered frames
pub const REFRESH_INTERVAL_US: u32 = 1_000_000 / REFRESH_RATE_HZ;

/// Microseconds between discovery requests
pub const DISCOVERY_INTERVAL_US: u32 = 1_000_000;

/// Microseconds between slave heartbeat log lines
pub const SLAVE_PING_INTERVAL_US: u32 = 10_000_000;

/// Master node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterConfig {
    /// Multicast group for discovery requests
    pub discovery_group: Ipv4Addr,
    /// Discovery UDP port (also the port acks must echo)
    pub discovery_port: u16,
    /// Time between discovery requests (µs)
    pub discovery_interval_us: u32,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            discovery_group: MULTICAST_DISCOVERY_ADDR,
            discovery_port: UDP_DISCOVERY_PORT,
            discovery_interval_us: DISCOVERY_INTERVAL_US,
        }
    }
}

/// Slave node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaveConfig {
    /// Id this slave answers to (byte 0 of every packet)
    pub slave_id: u8,
    /// Initial module height
    pub initial_y_size: u8,
    /// Time between rendered frames (µs)
    pub refresh_interval_us: u32,
    /// Time between heartbeat log lines (µs)
    pub ping_interval_us: u32,
}

impl Default for SlaveConfig {
    fn default() -> Self {
        Self {
            slave_id: 0,
            initial_y_size: DEFAULT_MODULE_Y_SIZE,
            refresh_interval_us: REFRESH_INTERVAL_US,
            ping_interval_us: SLAVE_PING_INTERVAL_US,
        }
    }
}
