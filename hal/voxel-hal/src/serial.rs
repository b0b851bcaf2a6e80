//! Serial packet transport abstractions
//!
//! The byte-level framing (COBS, SLIP, ...) is handled by the implementation.
//! Everything above this trait deals only in complete packets.

/// Receiver of complete packets
///
/// Called from the receive-completion context, so implementations must not
/// block and must synchronize any state shared with the main loop.
pub trait PacketHandler {
    /// Handle one deframed packet
    fn on_packet(&self, packet: &[u8]);
}

/// Packet-oriented serial link
pub trait SerialTransport {
    /// Error type for transmit operations
    type Error;

    /// Frame and send one packet
    fn send_packet(&mut self, packet: &[u8]) -> Result<(), Self::Error>;

    /// Pump received bytes and deliver each complete packet to `handler`
    fn poll<H: PacketHandler>(&mut self, handler: &H);

    /// Check if received bytes were lost since the last poll
    fn overflowed(&self) -> bool;
}
