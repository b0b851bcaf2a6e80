//! Slave node
//!
//! ```text
//!  serial rx (interrupt)               main loop
//! ┌──────────────────────┐          ┌──────────────────┐
//! │ FrameProtocolDecoder │─enqueue─►│  SharedSlave     │
//! └──────────────────────┘          │  (geometry,      │
//!                                   │   sequencer,     │
//!                                   │   frame ring)    │
//!                                   └────────┬─────────┘
//!                                         dequeue
//!                                   ┌────────▼─────────┐
//!                                   │ RenderScheduler  │──► StripDriver
//!                                   └──────────────────┘
//! ```

pub mod decoder;
pub mod node;
pub mod render;
pub mod shared;

pub use decoder::{DecodeError, Decoded, FrameProtocolDecoder};
pub use node::SlaveNode;
pub use render::RenderScheduler;
pub use shared::{DecoderStats, FrameQueue, SharedSlave, SlaveState, VoxelFrame};
