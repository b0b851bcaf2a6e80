//! Voxel frame rendering helpers
//!
//! Converts a decoded frame payload into strip pixels: each RGB triple is
//! gamma corrected and written at the strip index of its voxel.

pub mod gamma;
pub mod mapping;

pub use gamma::{gamma_correct, GAMMA8};
pub use mapping::{draw_frame, VoxelCursor};
