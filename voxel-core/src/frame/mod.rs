//! Frame sequencing and buffering
//!
//! Frames arrive from the receive path at an irregular rate and are drawn at
//! a fixed rate. The [`FrameSequencer`] discards stale ids and the
//! [`FrameRingBuffer`] holds accepted frames until the renderer takes them.

pub mod ring;
pub mod sequencer;

pub use ring::{Enqueued, Frame, FrameRingBuffer, RingError};
pub use sequencer::FrameSequencer;
