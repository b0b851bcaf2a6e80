//! Voxel Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the master and slave logic
//! depend on. Concrete network stacks, serial framers and LED strip drivers
//! live in board crates and implement these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Node logic (voxel-node)                │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  voxel-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//! ┌────────────┐ ┌──────────┐ ┌──────────┐
//! │ UDP / TCP  │ │  serial  │ │ LED DMA  │
//! │   stack    │ │  framer  │ │  driver  │
//! └────────────┘ └──────────┘ └──────────┘
//! ```
//!
//! # Traits
//!
//! - [`net::NetworkTransport`] - Datagrams, multicast and one TCP stream
//! - [`serial::SerialTransport`], [`serial::PacketHandler`] - Deframed packets
//! - [`strip::StripDriver`] - Addressable LED output

#![no_std]
#![deny(unsafe_code)]

pub mod net;
pub mod serial;
pub mod strip;

// Re-export key traits at crate root for convenience
pub use net::{Datagram, NetworkTransport};
pub use serial::{PacketHandler, SerialTransport};
pub use strip::{Rgb, StripDriver};
