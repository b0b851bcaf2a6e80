//! Connection state definition

use super::events::Event;

/// Master connection states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Multicasting discovery requests, waiting for an ack
    #[default]
    Discovering,
    /// Server known, opening the stream connection
    Connecting,
    /// Relaying server frames to the slaves
    Connected,
}

impl ConnectionState {
    /// Process an event and return the next state
    ///
    /// Transport failures always regress one step: a dropped connection
    /// retries the known server, a failed connect falls back to discovery.
    pub fn transition(self, event: Event) -> Self {
        use ConnectionState::*;
        use Event::*;

        match (self, event) {
            (Discovering, AckReceived) => Connecting,

            (Connecting, ConnectSucceeded) => Connected,
            (Connecting, ConnectFailed) => Discovering,

            (Connected, ConnectionLost) => Connecting,

            // Default: stay in current state
            _ => self,
        }
    }
}
