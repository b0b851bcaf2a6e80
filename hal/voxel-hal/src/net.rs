//! Network transport abstraction
//!
//! The master needs a UDP socket that can join a multicast group and a
//! single TCP client connection that the server writes into. Both are owned
//! by one implementation so the coordinator can tear the stream down when it
//! falls back to discovery.

use core::net::{Ipv4Addr, SocketAddrV4};

/// Metadata for a received datagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram {
    /// Full datagram length
    ///
    /// Larger than the caller's buffer if the datagram was truncated.
    pub len: usize,
    /// Address the datagram came from
    pub remote: SocketAddrV4,
}

/// Datagram and stream networking
///
/// All methods are non-blocking: receive operations return `Ok(None)` or
/// `Ok(0)` when nothing is pending.
pub trait NetworkTransport {
    /// Error type for socket operations
    type Error;

    /// Address assigned to this device on the local network
    fn local_address(&self) -> Ipv4Addr;

    /// Bind the datagram socket to `port` and join the multicast `group`
    fn join_multicast(&mut self, group: Ipv4Addr, port: u16) -> Result<(), Self::Error>;

    /// Send one datagram
    fn send_datagram(&mut self, to: SocketAddrV4, data: &[u8]) -> Result<(), Self::Error>;

    /// Receive one pending datagram, if any
    fn recv_datagram(&mut self, buf: &mut [u8]) -> Result<Option<Datagram>, Self::Error>;

    /// Open the stream connection
    fn connect(&mut self, to: SocketAddrV4) -> Result<(), Self::Error>;

    /// Check if the stream connection is still open
    fn is_connected(&self) -> bool;

    /// Read available stream bytes
    ///
    /// Returns the number of bytes read; zero means nothing was pending.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Close the stream connection
    fn disconnect(&mut self);
}
