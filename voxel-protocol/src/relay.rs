//! Server → master relay stream
//!
//! The server writes slave packets to the master's TCP stream, each prefixed
//! with its length:
//! - LENGTH (2 bytes, big-endian): packet length, 1..=N
//! - PACKET (LENGTH bytes): a complete slave packet, forwarded unchanged

use heapless::Vec;

/// Errors in the relay stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayError {
    /// Length prefix is zero or exceeds the parser's capacity
    InvalidLength(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Waiting for the high length byte
    WaitingForLengthHi,
    /// Got the high byte, waiting for the low one
    WaitingForLengthLo,
    /// Reading packet bytes
    ReadingPacket,
}

/// Byte-at-a-time parser for the relay stream
///
/// `N` is the largest packet accepted.
#[derive(Debug, Clone)]
pub struct RelayParser<const N: usize> {
    state: ParseState,
    buffer: Vec<u8, N>,
    expected_length: u16,
}

impl<const N: usize> Default for RelayParser<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RelayParser<N> {
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForLengthHi,
            buffer: Vec::new(),
            expected_length: 0,
        }
    }

    /// Drop any partial packet and wait for a new length prefix
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForLengthHi;
        self.buffer.clear();
        self.expected_length = 0;
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(packet))` when a packet completes. The slice stays
    /// valid until the next call.
    pub fn feed(&mut self, byte: u8) -> Result<Option<&[u8]>, RelayError> {
        match self.state {
            ParseState::WaitingForLengthHi => {
                self.buffer.clear();
                self.expected_length = (byte as u16) << 8;
                self.state = ParseState::WaitingForLengthLo;
                Ok(None)
            }
            ParseState::WaitingForLengthLo => {
                let length = self.expected_length | byte as u16;
                if length == 0 || length as usize > N {
                    self.reset();
                    return Err(RelayError::InvalidLength(length));
                }
                self.expected_length = length;
                self.state = ParseState::ReadingPacket;
                Ok(None)
            }
            ParseState::ReadingPacket => {
                // Cannot overflow: expected_length <= N
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    self.state = ParseState::WaitingForLengthHi;
                    return Ok(Some(self.buffer.as_slice()));
                }
                Ok(None)
            }
        }
    }

    /// Length prefix to send ahead of `packet`
    pub fn encode_prefix(packet: &[u8]) -> Result<[u8; 2], RelayError> {
        let len = u16::try_from(packet.len()).map_err(|_| RelayError::InvalidLength(u16::MAX))?;
        if len == 0 || len as usize > N {
            return Err(RelayError::InvalidLength(len));
        }
        Ok(len.to_be_bytes())
    }
}
