//! Voxel module geometry
//!
//! A module is `x` strips wide and `z` voxels deep, both fixed by the
//! hardware. Its height `y` is set at runtime by the master's welcome packet.
//!
//! LED wiring: every `x` step moves to the next strip (`y * z` LEDs), every
//! `z` step jumps `y` LEDs along the same strip, and every `y` step moves one
//! LED up.

use super::{DEFAULT_MODULE_Y_SIZE, MAX_MODULE_Y_SIZE, MODULE_X_SIZE, MODULE_Z_SIZE};

/// Rejected module height
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryError {
    /// Height of zero
    Zero,
    /// Height above [`MAX_MODULE_Y_SIZE`]
    TooLarge(u8),
}

/// Current module dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VoxelModuleGeometry {
    y_size: u8,
}

impl VoxelModuleGeometry {
    pub const X_SIZE: usize = MODULE_X_SIZE;
    pub const Z_SIZE: usize = MODULE_Z_SIZE;

    /// Geometry used until the first welcome packet
    pub const DEFAULT: Self = Self {
        y_size: DEFAULT_MODULE_Y_SIZE,
    };

    /// Validate and build a geometry with height `y_size`
    pub const fn new(y_size: u8) -> Result<Self, GeometryError> {
        match Self::validate(y_size) {
            Ok(()) => Ok(Self { y_size }),
            Err(e) => Err(e),
        }
    }

    const fn validate(y_size: u8) -> Result<(), GeometryError> {
        if y_size == 0 {
            Err(GeometryError::Zero)
        } else if y_size as usize > MAX_MODULE_Y_SIZE {
            Err(GeometryError::TooLarge(y_size))
        } else {
            Ok(())
        }
    }

    pub fn y_size(&self) -> usize {
        self.y_size as usize
    }

    /// LEDs on each strip
    pub fn leds_per_strip(&self) -> usize {
        self.y_size() * Self::Z_SIZE
    }

    /// LEDs in the whole module
    pub fn leds_per_module(&self) -> usize {
        Self::X_SIZE * self.leds_per_strip()
    }

    /// Payload bytes for one frame
    pub fn frame_len(&self) -> usize {
        3 * self.leds_per_module()
    }

    /// Change the height
    ///
    /// Returns `Ok(true)` if the height changed, `Ok(false)` if it already
    /// matched. On error the geometry is left unchanged.
    pub fn resize(&mut self, y_size: u8) -> Result<bool, GeometryError> {
        Self::validate(y_size)?;
        if y_size == self.y_size {
            return Ok(false);
        }
        self.y_size = y_size;
        Ok(true)
    }

    /// Strip pixel index for voxel `(x, y, z)`, or `None` if out of range
    pub fn pixel_index(&self, x: usize, y: usize, z: usize) -> Option<usize> {
        let y_size = self.y_size();
        if x >= Self::X_SIZE || y >= y_size || z >= Self::Z_SIZE {
            return None;
        }
        Some(x * y_size * Self::Z_SIZE + z * y_size + y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_and_oversize() {
        assert_eq!(VoxelModuleGeometry::new(0), Err(GeometryError::Zero));
        assert_eq!(
            VoxelModuleGeometry::new(MAX_MODULE_Y_SIZE as u8 + 1),
            Err(GeometryError::TooLarge(MAX_MODULE_Y_SIZE as u8 + 1))
        );
        assert!(VoxelModuleGeometry::new(MAX_MODULE_Y_SIZE as u8).is_ok());
    }

    #[test]
    fn test_sizes() {
        let geometry = VoxelModuleGeometry::new(5).unwrap();
        assert_eq!(geometry.leds_per_strip(), 5 * MODULE_Z_SIZE);
        assert_eq!(geometry.leds_per_module(), MODULE_X_SIZE * 5 * MODULE_Z_SIZE);
        assert_eq!(geometry.frame_len(), 3 * MODULE_X_SIZE * 5 * MODULE_Z_SIZE);
    }

    #[test]
    fn test_resize() {
        let mut geometry = VoxelModuleGeometry::new(8).unwrap();
        assert_eq!(geometry.resize(0), Err(GeometryError::Zero));
        assert_eq!(geometry.y_size(), 8);
        assert_eq!(geometry.resize(8), Ok(false));
        assert_eq!(geometry.resize(5), Ok(true));
        assert_eq!(geometry.y_size(), 5);
    }

    #[test]
    fn test_pixel_index() {
        let geometry = VoxelModuleGeometry::new(4).unwrap();
        assert_eq!(geometry.pixel_index(0, 0, 0), Some(0));
        assert_eq!(geometry.pixel_index(0, 1, 0), Some(1));
        assert_eq!(geometry.pixel_index(0, 0, 1), Some(4));
        assert_eq!(geometry.pixel_index(1, 0, 0), Some(4 * MODULE_Z_SIZE));
        assert_eq!(geometry.pixel_index(0, 4, 0), None);
        assert_eq!(geometry.pixel_index(MODULE_X_SIZE, 0, 0), None);
        assert_eq!(
            geometry.pixel_index(MODULE_X_SIZE - 1, 3, MODULE_Z_SIZE - 1),
            Some(geometry.leds_per_module() - 1)
        );
    }
}
