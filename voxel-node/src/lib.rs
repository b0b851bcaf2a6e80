//! Voxel display node logic
//!
//! Two roles share this crate:
//!
//! - **Master** ([`master`]): finds the control server with multicast
//!   discovery, keeps a stream connection to it, and relays every slave
//!   packet it receives onto the serial link.
//! - **Slave** ([`slave`]): decodes serial packets addressed to it, buffers
//!   accepted frames, and draws them onto its LED strips at a fixed rate.
//!
//! Both roles run a single cooperative loop driven by the measured loop time
//! in microseconds. On the slave, packet decoding may also run from the
//! serial receive interrupt; state it shares with the render loop is kept
//! behind a critical-section mutex.

#![no_std]
#![deny(unsafe_code)]

// Must go first so the other modules see the logging macros
mod fmt;

pub mod master;
pub mod slave;
