//! Master connection state machine
//!
//! The master is always in exactly one [`ConnectionState`]. Side effects of
//! entering a state (timer resets, socket teardown) belong to the owner of
//! the state; this module only defines which transitions exist.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::ConnectionState;
