//! Slave state shared between the receive path and the render loop
//!
//! Geometry, frame sequencer and frame ring live together behind one
//! critical-section mutex. A resize clears the ring in the same critical
//! section, and a dequeued frame carries the geometry it was decoded for, so
//! the renderer can never pair a payload with the wrong module size.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use voxel_core::config::{
    GeometryError, VoxelModuleGeometry, FRAME_QUEUE_CAPACITY, MAX_FRAME_PAYLOAD,
};
use voxel_core::frame::{Frame, FrameRingBuffer, FrameSequencer};

/// Frame ring sized for the largest module
pub type FrameQueue = FrameRingBuffer<FRAME_QUEUE_CAPACITY, MAX_FRAME_PAYLOAD>;

/// One frame of the largest module
pub type VoxelFrame = Frame<MAX_FRAME_PAYLOAD>;

/// Decoder counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecoderStats {
    /// Frames queued for rendering
    pub accepted: u32,
    /// Frames rejected by the sequencer
    pub stale: u32,
    /// Packets dropped as malformed, undersized or of unknown type
    pub rejected: u32,
    /// Queued frames overwritten before they were drawn
    pub evicted: u32,
    /// Welcome packets that reset the session
    pub sessions: u32,
    /// Packets addressed to another slave
    pub ignored: u32,
}

impl DecoderStats {
    const fn new() -> Self {
        Self {
            accepted: 0,
            stale: 0,
            rejected: 0,
            evicted: 0,
            sessions: 0,
            ignored: 0,
        }
    }
}

/// State owned jointly by the decoder and the renderer
pub struct SlaveState {
    pub geometry: VoxelModuleGeometry,
    pub sequencer: FrameSequencer,
    pub frames: FrameQueue,
    pub stats: DecoderStats,
}

impl SlaveState {
    pub const fn new(geometry: VoxelModuleGeometry) -> Self {
        Self {
            geometry,
            sequencer: FrameSequencer::new(),
            frames: FrameQueue::new(),
            stats: DecoderStats::new(),
        }
    }

    /// Start a new session with module height `y_size`
    ///
    /// On success the frame ring is emptied and the sequencer forgets its
    /// last id, whether or not the height changed. Returns whether it did.
    pub fn reinit(&mut self, y_size: u8) -> Result<bool, GeometryError> {
        let changed = self.geometry.resize(y_size)?;
        self.sequencer.reset();
        self.frames.clear();
        self.stats.sessions = self.stats.sessions.wrapping_add(1);
        Ok(changed)
    }
}

/// Interrupt-safe handle to [`SlaveState`]
///
/// Suitable for a `static`; every accessor runs inside a critical section.
pub struct SharedSlave {
    inner: Mutex<CriticalSectionRawMutex, RefCell<SlaveState>>,
}

impl SharedSlave {
    pub const fn new(geometry: VoxelModuleGeometry) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(SlaveState::new(geometry))),
        }
    }

    /// Run `f` with exclusive access to the state
    ///
    /// Keep `f` short: the receive interrupt is held off until it returns.
    pub fn lock<R>(&self, f: impl FnOnce(&mut SlaveState) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn reinit(&self, y_size: u8) -> Result<bool, GeometryError> {
        self.lock(|state| state.reinit(y_size))
    }

    /// Move the oldest queued frame into `out`
    pub fn pop_frame(&self, out: &mut VoxelFrame) -> bool {
        self.lock(|state| state.frames.dequeue_into(out))
    }

    pub fn geometry(&self) -> VoxelModuleGeometry {
        self.lock(|state| state.geometry)
    }

    pub fn last_known_frame_id(&self) -> Option<u16> {
        self.lock(|state| state.sequencer.last_known())
    }

    pub fn queued(&self) -> usize {
        self.lock(|state| state.frames.len())
    }

    pub fn stats(&self) -> DecoderStats {
        self.lock(|state| state.stats)
    }
}
