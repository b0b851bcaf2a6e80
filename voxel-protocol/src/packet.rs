//! Master → slave packets
//!
//! Packets arrive already deframed by the serial transport. The header is
//! two bytes (slave id, type tag); frame packets add a big-endian frame id.

/// Welcome / init packet: payload is the module's new y size
pub const TAG_WELCOME: u8 = b'W';
/// Full voxel frame: payload is one RGB triple per voxel
pub const TAG_FULL_FRAME: u8 = b'A';
/// Wipe frame: payload is a single RGB triple for every voxel
pub const TAG_WIPE_FRAME: u8 = b'C';

/// Bytes before the payload of a welcome packet
pub const HEADER_SIZE: usize = 2;
/// Bytes before the payload of a frame packet
pub const FRAME_HEADER_SIZE: usize = 4;

/// Slave packet decode/encode errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Not enough bytes for the header
    TooShort,
    /// Payload smaller than the packet type requires
    Undersized,
    /// Output buffer too small for encoding
    BufferTooSmall,
}

/// Packet type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    Welcome,
    FullFrame,
    WipeFrame,
    /// Unrecognised tag, kept for logging
    Unknown(u8),
}

impl PacketKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            TAG_WELCOME => PacketKind::Welcome,
            TAG_FULL_FRAME => PacketKind::FullFrame,
            TAG_WIPE_FRAME => PacketKind::WipeFrame,
            other => PacketKind::Unknown(other),
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            PacketKind::Welcome => TAG_WELCOME,
            PacketKind::FullFrame => TAG_FULL_FRAME,
            PacketKind::WipeFrame => TAG_WIPE_FRAME,
            PacketKind::Unknown(tag) => tag,
        }
    }

    /// Frame packets carry a frame id after the tag
    pub fn has_frame_id(self) -> bool {
        matches!(self, PacketKind::FullFrame | PacketKind::WipeFrame)
    }
}

/// A decoded slave packet borrowing its payload from the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomingPacket<'a> {
    /// Destination slave
    pub slave_id: u8,
    pub kind: PacketKind,
    /// Present for full and wipe frames
    pub frame_id: Option<u16>,
    /// Bytes after the header
    pub payload: &'a [u8],
}

impl<'a> IncomingPacket<'a> {
    /// Decode the header of `bytes`
    ///
    /// Payload size is not checked here since it depends on the receiving
    /// module's geometry.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, PacketError> {
        let (&slave_id, rest) = bytes.split_first().ok_or(PacketError::TooShort)?;
        let (&tag, rest) = rest.split_first().ok_or(PacketError::TooShort)?;
        let kind = PacketKind::from_tag(tag);

        if !kind.has_frame_id() {
            return Ok(Self {
                slave_id,
                kind,
                frame_id: None,
                payload: rest,
            });
        }

        match rest {
            [hi, lo, payload @ ..] => Ok(Self {
                slave_id,
                kind,
                frame_id: Some(u16::from_be_bytes([*hi, *lo])),
                payload,
            }),
            _ => Err(PacketError::TooShort),
        }
    }

    /// Encode a packet into `buf`, returning the number of bytes written
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, PacketError> {
        let header_len = if self.kind.has_frame_id() {
            FRAME_HEADER_SIZE
        } else {
            HEADER_SIZE
        };
        let total = header_len + self.payload.len();
        if buf.len() < total {
            return Err(PacketError::BufferTooSmall);
        }

        buf[0] = self.slave_id;
        buf[1] = self.kind.tag();
        if self.kind.has_frame_id() {
            let id = self.frame_id.unwrap_or(0).to_be_bytes();
            buf[2..4].copy_from_slice(&id);
        }
        buf[header_len..total].copy_from_slice(self.payload);

        Ok(total)
    }
}
