//! Events that trigger connection state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// A valid discovery ack addressed to this device arrived
    AckReceived,
    /// The stream connection to the server opened
    ConnectSucceeded,
    /// The stream connection could not be opened
    ConnectFailed,
    /// An open stream connection closed or failed
    ConnectionLost,
}
