//! Frame id sequencing
//!
//! Frame ids are a narrow counter that the sender may restart at any time.
//! Any id in `1..256` is taken as the start of a new run even if it is
//! numerically behind the last accepted id; anything else must be strictly
//! greater than the last accepted id.

/// Ids treated as the start of a new counting run
const RESET_WINDOW: core::ops::Range<u16> = 1..256;

/// Tracks the last accepted frame id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameSequencer {
    /// `None` until the first frame of a session is accepted
    last_known: Option<u16>,
}

impl FrameSequencer {
    pub const fn new() -> Self {
        Self { last_known: None }
    }

    /// Last accepted id, or `None` if unset
    pub fn last_known(&self) -> Option<u16> {
        self.last_known
    }

    /// Forget the last accepted id
    pub fn reset(&mut self) {
        self.last_known = None;
    }

    /// Check whether `frame_id` would be accepted, without recording it
    pub fn would_accept(&self, frame_id: u16) -> bool {
        if RESET_WINDOW.contains(&frame_id) {
            return true;
        }
        match self.last_known {
            None => true,
            Some(last) => frame_id > last,
        }
    }

    /// Accept or reject `frame_id`
    ///
    /// Accepted ids become the new last known id; rejected ids leave the
    /// sequencer untouched.
    pub fn accept(&mut self, frame_id: u16) -> bool {
        if !self.would_accept(frame_id) {
            return false;
        }
        self.last_known = Some(frame_id);
        true
    }
}
