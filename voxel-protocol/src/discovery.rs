//! Server discovery messages
//!
//! The master multicasts [`DISCOVERY_REQ`] until the server answers with an
//! ASCII acknowledgement naming the device it is meant for:
//!
//! ```text
//! ACK 192 168 1 40 20001;4000
//!     └─ address ──┘ └───┘ └──┘
//!                      │     └ server TCP port
//!                      └ discovery port the ack answers
//! ```
//!
//! The server's address is not in the payload; it is the datagram's sender.

use core::fmt::Write;
use core::net::Ipv4Addr;

use heapless::String;

use crate::field::{parse_decimal, FieldReader};

/// Multicast group the discovery request is sent to
pub const MULTICAST_DISCOVERY_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 42, 99);

/// UDP port used for discovery requests and acks
pub const UDP_DISCOVERY_PORT: u16 = 20001;

/// Discovery request payload (a single byte)
pub const DISCOVERY_REQ: u8 = b'?';

/// Acknowledgement header
pub const DISCOVERY_ACK: &[u8; 3] = b"ACK";

/// Smallest datagram worth inspecting as an ack
pub const DISCOVERY_ACK_MIN_SIZE: usize = DISCOVERY_ACK.len();

/// Longest well-formed ack: `ACK` + 4 × ` 255` + ` 65535;65535`
pub const DISCOVERY_ACK_MAX_SIZE: usize = 3 + 4 * 4 + 1 + 5 + 1 + 5;

/// Reasons an ack is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckError {
    /// First three bytes are not `ACK`
    HeaderMismatch,
    /// Missing separator or bad numeric field
    Malformed,
    /// Ack is addressed to another device or discovery port
    AddressMismatch,
}

/// A successfully parsed discovery ack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryAck {
    /// Server address (the ack's sender)
    pub server_address: Ipv4Addr,
    /// Discovery port echoed by the server
    pub discovery_port: u16,
    /// TCP port to connect to
    pub server_port: u16,
}

impl DiscoveryAck {
    /// Parse an ack datagram received from `sender`
    ///
    /// `local` and `discovery_port` identify this device; acks addressed to
    /// anyone else are reported as [`AckError::AddressMismatch`].
    pub fn parse(
        packet: &[u8],
        sender: Ipv4Addr,
        local: Ipv4Addr,
        discovery_port: u16,
    ) -> Result<Self, AckError> {
        let mut reader = FieldReader::new(packet);

        match reader.take(DISCOVERY_ACK.len()) {
            Some(header) if header == DISCOVERY_ACK => {}
            _ => return Err(AckError::HeaderMismatch),
        }

        if reader.next_byte() != Some(b' ') {
            return Err(AckError::Malformed);
        }

        let mut octets = [0u8; 4];
        for octet in octets.iter_mut() {
            *octet = parse_decimal(reader.next_field(b' '), u8::MAX as u32)
                .ok_or(AckError::Malformed)? as u8;
        }

        let read_port = parse_decimal(reader.next_field(b';'), u16::MAX as u32)
            .ok_or(AckError::Malformed)? as u16;

        if Ipv4Addr::from(octets) != local || read_port != discovery_port {
            return Err(AckError::AddressMismatch);
        }

        let server_port = parse_decimal(reader.next_field(b';'), u16::MAX as u32)
            .ok_or(AckError::Malformed)? as u16;

        Ok(Self {
            server_address: sender,
            discovery_port: read_port,
            server_port,
        })
    }

    /// Format the ack a server sends back to the device at `target`
    pub fn encode(
        target: Ipv4Addr,
        discovery_port: u16,
        server_port: u16,
    ) -> Result<String<DISCOVERY_ACK_MAX_SIZE>, AckError> {
        let [a, b, c, d] = target.octets();
        let mut out = String::new();
        write!(out, "ACK {} {} {} {} {};{}", a, b, c, d, discovery_port, server_port)
            .map_err(|_| AckError::Malformed)?;
        Ok(out)
    }
}
