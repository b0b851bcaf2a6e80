//! Board-agnostic core logic for the voxel display nodes
//!
//! This crate contains all logic that does not depend on a specific
//! network stack, serial framer or LED driver:
//!
//! - Compiled-in configuration and module geometry
//! - Master connection state machine
//! - Frame id sequencing and the bounded frame ring buffer
//! - Gamma correction and voxel-to-pixel mapping
//! - Elapsed-time cadence timers

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod render;
pub mod state;
pub mod timing;
