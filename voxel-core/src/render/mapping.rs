//! Voxel payload to strip pixel mapping
//!
//! Payloads list voxels with `x` outermost, then `y`, then `z`, three bytes
//! (R, G, B) each. Strip indices follow the module wiring described in
//! [`VoxelModuleGeometry`].

use voxel_hal::{Rgb, StripDriver};

use super::gamma::gamma_correct;
use crate::config::VoxelModuleGeometry;

/// Walks every voxel of a module in payload order
///
/// Yields `(payload_offset, pixel_index)` pairs.
#[derive(Debug, Clone)]
pub struct VoxelCursor {
    geometry: VoxelModuleGeometry,
    x: usize,
    y: usize,
    z: usize,
    offset: usize,
}

impl VoxelCursor {
    pub fn new(geometry: VoxelModuleGeometry) -> Self {
        Self {
            geometry,
            x: 0,
            y: 0,
            z: 0,
            offset: 0,
        }
    }
}

impl Iterator for VoxelCursor {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.geometry.pixel_index(self.x, self.y, self.z)?;
        let item = (self.offset, index);

        self.offset += 3;
        self.z += 1;
        if self.z == VoxelModuleGeometry::Z_SIZE {
            self.z = 0;
            self.y += 1;
            if self.y == self.geometry.y_size() {
                self.y = 0;
                self.x += 1;
            }
        }

        Some(item)
    }
}

/// Write a frame payload to `strip`, gamma corrected
///
/// Stops at the first voxel the payload has no bytes for. Returns the number
/// of pixels written. Does not call [`StripDriver::show`].
pub fn draw_frame<S: StripDriver>(
    geometry: VoxelModuleGeometry,
    payload: &[u8],
    strip: &mut S,
) -> usize {
    let mut drawn = 0;
    for (offset, index) in VoxelCursor::new(geometry) {
        let Some(color) = payload.get(offset..).and_then(Rgb::from_slice) else {
            break;
        };
        strip.set_pixel(index, gamma_correct(color));
        drawn += 1;
    }
    drawn
}
