//! Slave packet decoder
//!
//! Runs in the serial receive context. Packets for other slaves are dropped
//! without comment; everything else is dispatched on its type tag and either
//! changes the session, queues a frame, or is logged and dropped.

use voxel_core::config::GeometryError;
use voxel_core::frame::{Enqueued, RingError};
use voxel_hal::PacketHandler;
use voxel_protocol::{IncomingPacket, PacketError, PacketKind};

use super::shared::{SharedSlave, SlaveState};

/// Why a packet addressed to this slave was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Header could not be decoded
    Packet(PacketError),
    /// Unrecognised type tag
    UnknownType(u8),
    /// Payload shorter than the packet type requires
    Undersized { needed: usize, got: usize },
    /// Frame id rejected by the sequencer
    Stale(u16),
    /// Welcome packet requested an invalid height
    Geometry(GeometryError),
}

impl From<PacketError> for DecodeError {
    fn from(e: PacketError) -> Self {
        DecodeError::Packet(e)
    }
}

impl From<GeometryError> for DecodeError {
    fn from(e: GeometryError) -> Self {
        DecodeError::Geometry(e)
    }
}

/// What a packet did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decoded {
    /// Addressed to another slave
    Ignored,
    /// Welcome accepted; `resized` if the height changed
    Session { y_size: u8, resized: bool },
    /// Frame queued
    Queued { frame_id: u16, evicted: Option<u16> },
}

/// Decoder for one slave id
pub struct FrameProtocolDecoder<'a> {
    slave_id: u8,
    shared: &'a SharedSlave,
}

impl<'a> FrameProtocolDecoder<'a> {
    pub fn new(slave_id: u8, shared: &'a SharedSlave) -> Self {
        Self { slave_id, shared }
    }

    pub fn slave_id(&self) -> u8 {
        self.slave_id
    }

    /// Decode and apply one packet
    pub fn decode(&self, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        match bytes.first() {
            Some(&id) if id == self.slave_id => {}
            Some(_) => {
                self.shared
                    .lock(|state| state.stats.ignored = state.stats.ignored.wrapping_add(1));
                return Ok(Decoded::Ignored);
            }
            None => return Ok(Decoded::Ignored),
        }

        self.shared.lock(|state| {
            let result = Self::apply(state, bytes);
            if let Err(e) = result {
                match e {
                    DecodeError::Stale(_) => state.stats.stale = state.stats.stale.wrapping_add(1),
                    _ => state.stats.rejected = state.stats.rejected.wrapping_add(1),
                }
            }
            result
        })
    }

    fn apply(state: &mut SlaveState, bytes: &[u8]) -> Result<Decoded, DecodeError> {
        let packet = IncomingPacket::parse(bytes)?;
        match packet.kind {
            PacketKind::Welcome => {
                let &y_size = packet.payload.first().ok_or(DecodeError::Undersized {
                    needed: 1,
                    got: 0,
                })?;
                let resized = state.reinit(y_size)?;
                Ok(Decoded::Session { y_size, resized })
            }
            PacketKind::FullFrame => {
                let frame_len = state.geometry.frame_len();
                let payload = packet
                    .payload
                    .get(..frame_len)
                    .ok_or(DecodeError::Undersized {
                        needed: frame_len,
                        got: packet.payload.len(),
                    })?;
                let frame_id = Self::sequence(state, packet.frame_id)?;
                let outcome = state.frames.enqueue(frame_id, state.geometry, payload);
                Ok(Self::queued(state, frame_id, outcome))
            }
            PacketKind::WipeFrame => {
                let rgb = packet.payload.get(..3).ok_or(DecodeError::Undersized {
                    needed: 3,
                    got: packet.payload.len(),
                })?;
                let frame_id = Self::sequence(state, packet.frame_id)?;
                let frame_len = state.geometry.frame_len();
                let outcome = state
                    .frames
                    .enqueue_with(frame_id, state.geometry, frame_len, |slot| {
                        for voxel in slot.chunks_exact_mut(3) {
                            voxel.copy_from_slice(rgb);
                        }
                    });
                Ok(Self::queued(state, frame_id, outcome))
            }
            PacketKind::Unknown(tag) => Err(DecodeError::UnknownType(tag)),
        }
    }

    fn sequence(state: &mut SlaveState, frame_id: Option<u16>) -> Result<u16, DecodeError> {
        let frame_id = frame_id.ok_or(DecodeError::Packet(PacketError::TooShort))?;
        if !state.sequencer.accept(frame_id) {
            return Err(DecodeError::Stale(frame_id));
        }
        Ok(frame_id)
    }

    fn queued(
        state: &mut SlaveState,
        frame_id: u16,
        outcome: Result<Enqueued, RingError>,
    ) -> Decoded {
        let evicted = match outcome {
            Ok(Enqueued::Stored) => None,
            Ok(Enqueued::Evicted { id }) => {
                state.stats.evicted = state.stats.evicted.wrapping_add(1);
                Some(id)
            }
            // Slots hold the largest geometry, so this cannot happen
            Err(_) => None,
        };
        state.stats.accepted = state.stats.accepted.wrapping_add(1);
        Decoded::Queued { frame_id, evicted }
    }
}

impl PacketHandler for FrameProtocolDecoder<'_> {
    fn on_packet(&self, packet: &[u8]) {
        match self.decode(packet) {
            Ok(Decoded::Ignored) => {}
            Ok(Decoded::Session { y_size, resized }) => {
                if resized {
                    info!("Reinitialized module, new y size {}", y_size);
                } else {
                    debug!("Welcome received, y size {} unchanged", y_size);
                }
            }
            Ok(Decoded::Queued { frame_id, evicted }) => {
                trace!("Queued frame {}", frame_id);
                if let Some(old) = evicted {
                    debug!("Frame queue full, dropped frame {}", old);
                }
            }
            Err(DecodeError::Stale(frame_id)) => {
                debug!("Throwing out stale frame {}", frame_id);
            }
            Err(DecodeError::Geometry(e)) => {
                error!("Ignoring invalid module y size: {:?}", e);
            }
            Err(e) => {
                warn!("Dropped packet: {:?}", e);
            }
        }
    }
}
