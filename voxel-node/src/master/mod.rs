//! Master node
//!
//! The master owns the connection lifecycle: discovery, connection and
//! relaying server packets to the slaves.

pub mod coordinator;

pub use coordinator::{DiscoveryCoordinator, RelayStats};
