//! Voxel Display Wire Protocols
//!
//! This crate defines every byte format the master and slave nodes exchange:
//!
//! - **Discovery** (UDP, master ↔ server): a one-byte request multicast to the
//!   discovery group and an ASCII acknowledgement
//!   ```text
//!   ACK <a> <b> <c> <d> <discoveryPort>;<serverPort>
//!   ```
//! - **Relay** (TCP, server → master): length-prefixed slave packets
//!   ```text
//!   ┌────────────┬──────────────────────┐
//!   │ LENGTH u16 │ SLAVE PACKET         │
//!   │ 2B (BE)    │ LENGTH bytes         │
//!   └────────────┴──────────────────────┘
//!   ```
//! - **Slave packets** (serial, master → slave), already deframed by the
//!   serial transport
//!   ```text
//!   ┌──────────┬─────┬─────────────────┬─────────────┐
//!   │ SLAVE ID │ TAG │ FRAME ID (BE)   │ PAYLOAD     │
//!   │ 1B       │ 1B  │ 2B, frames only │ 0–N bytes   │
//!   └──────────┴─────┴─────────────────┴─────────────┘
//!   ```

#![no_std]
#![deny(unsafe_code)]

pub mod discovery;
pub mod field;
pub mod packet;
pub mod relay;

pub use discovery::{
    AckError, DiscoveryAck, DISCOVERY_ACK, DISCOVERY_REQ, MULTICAST_DISCOVERY_ADDR,
    UDP_DISCOVERY_PORT,
};
pub use field::FieldReader;
pub use packet::{IncomingPacket, PacketError, PacketKind};
pub use relay::{RelayError, RelayParser};
