//! Discovery and connection coordinator
//!
//! Drives the master through [`ConnectionState`]:
//!
//! ```text
//!            ack for us             connect ok
//! Discovering ─────────► Connecting ─────────► Connected
//!      ▲                  │      ▲                 │
//!      └── connect failed ┘      └─ stream closed ─┘
//! ```
//!
//! Entering `Discovering` restarts the request timer and closes any stream,
//! and entering `Connecting` closes a stream that is still open. Entering
//! `Connected` drops any partial relay packet and replays the last welcome
//! relayed to each slave, so every slave starts the new stream with an empty
//! queue and no last frame id.

use core::net::SocketAddrV4;

use voxel_core::config::{MasterConfig, VoxelModuleGeometry, MAX_SLAVE_PACKET_SIZE};
use voxel_core::state::{ConnectionState, Event};
use voxel_core::timing::Interval;
use voxel_hal::{NetworkTransport, SerialTransport};
use voxel_protocol::discovery::{DISCOVERY_ACK_MAX_SIZE, DISCOVERY_ACK_MIN_SIZE};
use voxel_protocol::packet::TAG_WELCOME;
use voxel_protocol::{
    AckError, DiscoveryAck, IncomingPacket, PacketKind, RelayParser, DISCOVERY_REQ,
};

/// Bytes pulled from the stream per read
const STREAM_CHUNK_SIZE: usize = 512;

/// Stream reads per `run` call while connected
const MAX_READS_PER_RUN: usize = 8;

/// Counters for relayed traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayStats {
    /// Packets forwarded to the serial link
    pub forwarded: u32,
    /// Packets the serial link refused
    pub send_failures: u32,
    /// Bad length prefixes in the server stream
    pub framing_errors: u32,
    /// Welcomes replayed to slaves on reconnect
    pub replayed_welcomes: u32,
}

/// Last welcome height relayed to each slave id
#[derive(Debug, Clone)]
struct WelcomeLog {
    y_sizes: [Option<u8>; 256],
}

impl WelcomeLog {
    const fn new() -> Self {
        Self {
            y_sizes: [None; 256],
        }
    }

    /// Remember `packet` if it is a welcome the slave will accept
    fn observe(&mut self, packet: &[u8]) {
        if let Ok(IncomingPacket {
            slave_id,
            kind: PacketKind::Welcome,
            payload: [y_size, ..],
            ..
        }) = IncomingPacket::parse(packet)
        {
            if VoxelModuleGeometry::new(*y_size).is_ok() {
                self.y_sizes[slave_id as usize] = Some(*y_size);
            }
        }
    }

    /// `(slave_id, y_size)` for every slave that has been welcomed
    fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..=u8::MAX).zip(self.y_sizes.iter()).filter_map(|(id, y)| y.map(|y| (id, y)))
    }
}

/// Master connection state machine
pub struct DiscoveryCoordinator<N, T>
where
    N: NetworkTransport,
    T: SerialTransport,
{
    config: MasterConfig,
    net: N,
    serial: T,
    state: ConnectionState,
    /// Endpoint from the last accepted ack
    server: Option<SocketAddrV4>,
    discovery_timer: Interval,
    relay: RelayParser<MAX_SLAVE_PACKET_SIZE>,
    welcomes: WelcomeLog,
    stats: RelayStats,
}

impl<N, T> DiscoveryCoordinator<N, T>
where
    N: NetworkTransport,
    T: SerialTransport,
{
    /// Create a coordinator in `Discovering`
    ///
    /// The first discovery request goes out on the first [`run`](Self::run).
    pub fn new(config: MasterConfig, net: N, serial: T) -> Self {
        Self {
            config,
            net,
            serial,
            state: ConnectionState::Discovering,
            server: None,
            discovery_timer: Interval::due(config.discovery_interval_us),
            relay: RelayParser::new(),
            welcomes: WelcomeLog::new(),
            stats: RelayStats::default(),
        }
    }

    /// Join the discovery multicast group
    ///
    /// Must be called once the network is up and before the first `run`.
    pub fn begin(&mut self) -> Result<(), N::Error> {
        self.state = ConnectionState::Discovering;
        self.net
            .join_multicast(self.config.discovery_group, self.config.discovery_port)?;
        info!(
            "Joined discovery group {} port {}",
            self.config.discovery_group.octets(),
            self.config.discovery_port
        );
        Ok(())
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Server endpoint, once discovered
    pub fn server(&self) -> Option<SocketAddrV4> {
        self.server
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }

    pub fn net(&self) -> &N {
        &self.net
    }

    pub fn net_mut(&mut self) -> &mut N {
        &mut self.net
    }

    pub fn serial(&self) -> &T {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut T {
        &mut self.serial
    }

    /// Advance the state machine
    ///
    /// # Arguments
    /// - `dt_us`: Time elapsed since the previous call
    pub fn run(&mut self, dt_us: u32) {
        match self.state {
            ConnectionState::Discovering => {
                self.discovery_timer.accumulate(dt_us);
                self.send_discovery_request();
                self.receive_discovery_ack();
            }
            ConnectionState::Connecting => self.initiate_connection(),
            ConnectionState::Connected => self.relay_server_packets(),
        }
    }

    fn handle(&mut self, event: Event) {
        let next = self.state.transition(event);
        if next != self.state {
            self.set_state(next);
        }
    }

    /// Enter `next`, running its entry actions even if already there
    fn set_state(&mut self, next: ConnectionState) {
        match next {
            ConnectionState::Discovering => {
                info!("Entering Discovering state");
                self.discovery_timer.reset();
                self.server = None;
                if self.net.is_connected() {
                    self.net.disconnect();
                }
            }
            ConnectionState::Connecting => {
                info!("Entering Connecting state");
                if self.net.is_connected() {
                    self.net.disconnect();
                }
            }
            ConnectionState::Connected => {
                info!("Entering Connected state");
                self.relay.reset();
                self.replay_welcomes();
            }
        }
        self.state = next;
    }

    fn send_discovery_request(&mut self) {
        if !self.discovery_timer.is_due() {
            return;
        }
        self.discovery_timer.reset();

        debug!("Sending discovery request");
        let to = SocketAddrV4::new(self.config.discovery_group, self.config.discovery_port);
        if self.net.send_datagram(to, &[DISCOVERY_REQ]).is_err() {
            warn!("Failed to send discovery request");
        }
    }

    fn receive_discovery_ack(&mut self) {
        let mut buf = [0u8; DISCOVERY_ACK_MAX_SIZE + 1];
        let datagram = match self.net.recv_datagram(&mut buf) {
            Ok(Some(datagram)) => datagram,
            Ok(None) => return,
            Err(_) => {
                warn!("Discovery socket receive failed");
                return;
            }
        };

        if datagram.len > buf.len() {
            warn!("Rejected discovery ack: {:?}", AckError::Malformed);
            return;
        }
        let len = datagram.len;
        if len < DISCOVERY_ACK_MIN_SIZE {
            debug!("Ignoring {} byte datagram while discovering", len);
            return;
        }

        let sender = *datagram.remote.ip();
        let local = self.net.local_address();
        match DiscoveryAck::parse(&buf[..len], sender, local, self.config.discovery_port) {
            Ok(ack) => {
                self.server = Some(SocketAddrV4::new(ack.server_address, ack.server_port));
                info!(
                    "Discovered server {} port {}",
                    ack.server_address.octets(),
                    ack.server_port
                );
                self.handle(Event::AckReceived);
            }
            Err(AckError::AddressMismatch) => {
                debug!("Discovery ack addressed to another device");
            }
            Err(e) => {
                warn!("Rejected discovery ack: {:?}", e);
            }
        }
    }

    fn initiate_connection(&mut self) {
        let Some(server) = self.server else {
            self.set_state(ConnectionState::Discovering);
            return;
        };

        info!("Connecting to server {} port {}", server.ip().octets(), server.port());
        match self.net.connect(server) {
            Ok(()) => self.handle(Event::ConnectSucceeded),
            Err(_) => {
                warn!("Connection failed, rediscovering server");
                self.handle(Event::ConnectFailed);
            }
        }
    }

    /// Resend the last welcome each slave saw so it drops frames and frame
    /// ids from the previous connection
    fn replay_welcomes(&mut self) {
        for (slave_id, y_size) in self.welcomes.iter() {
            let packet = [slave_id, TAG_WELCOME, y_size];
            if self.serial.send_packet(&packet).is_ok() {
                self.stats.replayed_welcomes = self.stats.replayed_welcomes.wrapping_add(1);
                debug!("Replayed welcome to slave {}", slave_id);
            } else {
                self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                warn!("Serial link refused welcome for slave {}", slave_id);
            }
        }
    }

    fn relay_server_packets(&mut self) {
        if !self.net.is_connected() {
            warn!("Server connection closed");
            self.handle(Event::ConnectionLost);
            return;
        }

        let mut chunk = [0u8; STREAM_CHUNK_SIZE];
        for _ in 0..MAX_READS_PER_RUN {
            let n = match self.net.read(&mut chunk) {
                Ok(0) => return,
                Ok(n) => n.min(chunk.len()),
                Err(_) => {
                    warn!("Server stream read failed");
                    self.handle(Event::ConnectionLost);
                    return;
                }
            };

            for &byte in &chunk[..n] {
                match self.relay.feed(byte) {
                    Ok(Some(packet)) => {
                        self.welcomes.observe(packet);
                        if self.serial.send_packet(packet).is_ok() {
                            self.stats.forwarded = self.stats.forwarded.wrapping_add(1);
                        } else {
                            self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                            warn!("Serial link refused {} byte packet", packet.len());
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        self.stats.framing_errors = self.stats.framing_errors.wrapping_add(1);
                        warn!("Relay stream framing error: {:?}", e);
                    }
                }
            }
        }
    }
}
