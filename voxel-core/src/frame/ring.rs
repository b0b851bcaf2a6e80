//! Fixed-capacity frame ring buffer
//!
//! Holds up to `C` frames of at most `N` payload bytes each. When full, a
//! new frame overwrites the oldest one; overflow is an eviction policy, not
//! an error. The buffer itself is not synchronized: the owner must guard it
//! when producer and consumer run in different contexts.

use crate::config::VoxelModuleGeometry;

/// Ring buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RingError {
    /// Payload larger than a slot
    FrameTooLarge(usize),
}

/// Result of a successful enqueue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enqueued {
    /// Stored in a free slot
    Stored,
    /// Buffer was full; the oldest frame (with this id) was overwritten
    Evicted { id: u16 },
}

/// One buffered frame
///
/// Carries the geometry it was decoded for so the renderer never reads a
/// payload with a different module size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const N: usize> {
    id: u16,
    geometry: VoxelModuleGeometry,
    len: usize,
    data: [u8; N],
}

impl<const N: usize> Frame<N> {
    pub const EMPTY: Self = Self {
        id: 0,
        geometry: VoxelModuleGeometry::DEFAULT,
        len: 0,
        data: [0; N],
    };

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn geometry(&self) -> VoxelModuleGeometry {
        self.geometry
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[..self.len]
    }

    fn copy_from(&mut self, other: &Self) {
        self.id = other.id;
        self.geometry = other.geometry;
        self.len = other.len;
        self.data[..other.len].copy_from_slice(other.payload());
    }
}

/// Circular frame queue with overwrite-oldest policy
#[derive(Debug)]
pub struct FrameRingBuffer<const C: usize, const N: usize> {
    slots: [Frame<N>; C],
    count: usize,
    start: usize,
}

impl<const C: usize, const N: usize> Default for FrameRingBuffer<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize, const N: usize> FrameRingBuffer<C, N> {
    pub const fn new() -> Self {
        Self {
            slots: [const { Frame::EMPTY }; C],
            count: 0,
            start: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        C
    }

    /// Number of buffered frames
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drop every buffered frame
    pub fn clear(&mut self) {
        self.count = 0;
        self.start = 0;
    }

    /// Copy `payload` into the next slot
    pub fn enqueue(
        &mut self,
        id: u16,
        geometry: VoxelModuleGeometry,
        payload: &[u8],
    ) -> Result<Enqueued, RingError> {
        self.enqueue_with(id, geometry, payload.len(), |slot| {
            slot.copy_from_slice(payload)
        })
    }

    /// Fill the next slot in place
    ///
    /// `fill` receives a `len`-byte slice to write the payload into.
    pub fn enqueue_with<F>(
        &mut self,
        id: u16,
        geometry: VoxelModuleGeometry,
        len: usize,
        fill: F,
    ) -> Result<Enqueued, RingError>
    where
        F: FnOnce(&mut [u8]),
    {
        if len > N {
            return Err(RingError::FrameTooLarge(len));
        }
        if C == 0 {
            return Ok(Enqueued::Stored);
        }

        let idx = (self.start + self.count) % C;
        let slot = &mut self.slots[idx];
        let outcome = if self.count == C {
            Enqueued::Evicted { id: slot.id }
        } else {
            Enqueued::Stored
        };

        slot.id = id;
        slot.geometry = geometry;
        slot.len = len;
        fill(&mut slot.data[..len]);

        if self.count == C {
            self.start = (self.start + 1) % C;
        } else {
            self.count += 1;
        }

        Ok(outcome)
    }

    /// Move the oldest frame into `out`
    ///
    /// Returns `false` (leaving `out` untouched) if the buffer is empty.
    pub fn dequeue_into(&mut self, out: &mut Frame<N>) -> bool {
        if self.count == 0 {
            return false;
        }
        out.copy_from(&self.slots[self.start]);
        self.start = (self.start + 1) % C;
        self.count -= 1;
        true
    }

    /// Remove and return the oldest frame
    pub fn dequeue(&mut self) -> Option<Frame<N>> {
        let mut frame = Frame::EMPTY;
        self.dequeue_into(&mut frame).then_some(frame)
    }
}
