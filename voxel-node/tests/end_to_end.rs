//! Server → master → serial → slave → strip, with in-memory transports

use std::cell::RefCell;
use std::collections::VecDeque;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::rc::Rc;

use voxel_core::config::{MasterConfig, SlaveConfig, VoxelModuleGeometry, REFRESH_INTERVAL_US};
use voxel_core::render::gamma::gamma8;
use voxel_core::state::ConnectionState;
use voxel_hal::{Datagram, NetworkTransport, PacketHandler, Rgb, SerialTransport, StripDriver};
use voxel_node::master::DiscoveryCoordinator;
use voxel_node::slave::{SharedSlave, SlaveNode};
use voxel_protocol::packet::{TAG_FULL_FRAME, TAG_WELCOME, TAG_WIPE_FRAME};
use voxel_protocol::{DiscoveryAck, RelayParser, UDP_DISCOVERY_PORT};

const LOCAL: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
const SERVER: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const SERVER_PORT: u16 = 7000;

/// Server side of the discovery socket and the stream
#[derive(Default)]
struct FakeServer {
    acks: VecDeque<Vec<u8>>,
    requests: usize,
    stream: VecDeque<u8>,
    connected: bool,
}

#[derive(Clone, Default)]
struct FakeNet(Rc<RefCell<FakeServer>>);

impl NetworkTransport for FakeNet {
    type Error = ();

    fn local_address(&self) -> Ipv4Addr {
        LOCAL
    }

    fn join_multicast(&mut self, _group: Ipv4Addr, _port: u16) -> Result<(), ()> {
        Ok(())
    }

    fn send_datagram(&mut self, _to: SocketAddrV4, _data: &[u8]) -> Result<(), ()> {
        let mut server = self.0.borrow_mut();
        server.requests += 1;
        let ack = DiscoveryAck::encode(LOCAL, UDP_DISCOVERY_PORT, SERVER_PORT).map_err(|_| ())?;
        server.acks.push_back(ack.as_bytes().to_vec());
        Ok(())
    }

    fn recv_datagram(&mut self, buf: &mut [u8]) -> Result<Option<Datagram>, ()> {
        Ok(self.0.borrow_mut().acks.pop_front().map(|ack| {
            let copied = ack.len().min(buf.len());
            buf[..copied].copy_from_slice(&ack[..copied]);
            Datagram {
                len: ack.len(),
                remote: SocketAddrV4::new(SERVER, UDP_DISCOVERY_PORT),
            }
        }))
    }

    fn connect(&mut self, to: SocketAddrV4) -> Result<(), ()> {
        assert_eq!(to, SocketAddrV4::new(SERVER, SERVER_PORT));
        self.0.borrow_mut().connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.0.borrow().connected
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let mut server = self.0.borrow_mut();
        let n = buf.len().min(server.stream.len());
        for (dst, src) in buf.iter_mut().zip(server.stream.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }


    fn disconnect(&mut self) {
        self.0.borrow_mut().connected = false;
    }
}

impl FakeNet {
    fn send_to_slaves(&self, packet: &[u8]) {
        let prefix = RelayParser::<4096>::encode_prefix(packet).unwrap();
        let mut server = self.0.borrow_mut();
        server.stream.extend(prefix);
        server.stream.extend(packet.iter().copied());
    }
}

/// Serial bus shared by the master's transmitter and every slave's receiver
#[derive(Clone, Default)]
struct SerialBus(Rc<RefCell<Vec<Vec<u8>>>>);

/// Master end of the bus
struct BusTx(SerialBus);

impl SerialTransport for BusTx {
    type Error = ();

    fn send_packet(&mut self, packet: &[u8]) -> Result<(), ()> {
        (self.0).0.borrow_mut().push(packet.to_vec());
        Ok(())
    }

    fn poll<H: PacketHandler>(&mut self, _handler: &H) {}

    fn overflowed(&self) -> bool {
        false
    }
}

/// Slave end of the bus; every slave sees every packet
struct BusRx {
    bus: SerialBus,
    seen: usize,
}

impl SerialTransport for BusRx {
    type Error = ();

    fn send_packet(&mut self, _packet: &[u8]) -> Result<(), ()> {
        Ok(())
    }

    fn poll<H: PacketHandler>(&mut self, handler: &H) {
        let packets = self.bus.0.borrow();
        for packet in &packets[self.seen..] {
            handler.on_packet(packet);
        }
        self.seen = packets.len();
    }

    fn overflowed(&self) -> bool {
        false
    }
}

struct VecStrip {
    pixels: Vec<Rgb>,
    shows: usize,
}

impl VecStrip {
    fn new() -> Self {
        Self {
            pixels: Vec::new(),
            shows: 0,
        }
    }
}

impl StripDriver for VecStrip {
    fn begin(&mut self, leds_per_strip: usize) {
        let leds = leds_per_strip * VoxelModuleGeometry::X_SIZE;
        self.pixels = vec![Rgb::BLACK; leds];
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.pixels[index] = color;
    }

    fn show(&mut self) {
        self.shows += 1;
    }
}

fn slave<'a>(
    id: u8,
    shared: &'a SharedSlave,
    bus: &SerialBus,
) -> SlaveNode<'a, BusRx, VecStrip> {
    let config = SlaveConfig {
        slave_id: id,
        ..SlaveConfig::default()
    };
    let rx = BusRx {
        bus: bus.clone(),
        seen: 0,
    };
    SlaveNode::new(config, shared, rx, VecStrip::new()).unwrap()
}

fn connected_master(net: &FakeNet, bus: &SerialBus) -> DiscoveryCoordinator<FakeNet, BusTx> {
    let mut master =
        DiscoveryCoordinator::new(MasterConfig::default(), net.clone(), BusTx(bus.clone()));
    master.begin().unwrap();
    master.run(0);
    assert_eq!(net.0.borrow().requests, 1);
    assert_eq!(master.state(), ConnectionState::Connecting);
    master.run(0);
    assert_eq!(master.state(), ConnectionState::Connected);
    master
}

fn full_frame(slave_id: u8, frame_id: u16, geometry: VoxelModuleGeometry) -> Vec<u8> {
    let mut packet = vec![slave_id, TAG_FULL_FRAME];
    packet.extend(frame_id.to_be_bytes());
    packet.resize(4 + geometry.frame_len(), 0);
    packet
}

#[test]
fn test_full_frame_reaches_addressed_voxel() {
    let net = FakeNet::default();
    let bus = SerialBus::default();
    let mut master = connected_master(&net, &bus);

    let shared0 = SharedSlave::new(VoxelModuleGeometry::DEFAULT);
    let shared1 = SharedSlave::new(VoxelModuleGeometry::DEFAULT);
    let mut slave0 = slave(0, &shared0, &bus);
    let mut slave1 = slave(1, &shared1, &bus);

    let geometry = VoxelModuleGeometry::new(4).unwrap();
    net.send_to_slaves(&[0, TAG_WELCOME, 4]);

    // Light voxel (x=2, y=3, z=5): payload offset follows x, then y, then z
    let mut frame = full_frame(0, 7, geometry);
    let offset = 4 + 3 * ((2 * 4 + 3) * VoxelModuleGeometry::Z_SIZE + 5);
    frame[offset..offset + 3].copy_from_slice(&[255, 128, 0]);
    net.send_to_slaves(&frame);

    master.run(0);
    assert_eq!(master.stats().forwarded, 2);

    assert!(slave0.run(REFRESH_INTERVAL_US));
    assert!(!slave1.run(REFRESH_INTERVAL_US));

    let index = geometry.pixel_index(2, 3, 5).unwrap();
    assert_eq!(index, 2 * 4 * VoxelModuleGeometry::Z_SIZE + 5 * 4 + 3);
    let strip = slave0.strip();
    assert_eq!(strip.pixels.len(), geometry.leds_per_module());
    assert_eq!(strip.pixels[index], Rgb::new(255, 37, 0));
    assert_eq!(strip.pixels.iter().filter(|p| **p != Rgb::BLACK).count(), 1);
    assert_eq!(shared0.last_known_frame_id(), Some(7));
}

#[test]
fn test_stale_frames_are_not_drawn() {
    let net = FakeNet::default();
    let bus = SerialBus::default();
    let mut master = connected_master(&net, &bus);

    let shared = SharedSlave::new(VoxelModuleGeometry::DEFAULT);
    let mut node = slave(3, &shared, &bus);

    net.send_to_slaves(&[3, TAG_WIPE_FRAME, 2, 0, 9, 9, 9]);
    net.send_to_slaves(&[3, TAG_WIPE_FRAME, 1, 0x50, 1, 1, 1]);
    master.run(0);

    assert!(node.run(REFRESH_INTERVAL_US));
    assert!(!node.run(REFRESH_INTERVAL_US));
    assert_eq!(shared.stats().stale, 1);
    let level = gamma8(9);
    assert_eq!(node.strip().pixels[0], Rgb::new(level, level, level));
}

#[test]
fn test_reconnect_starts_fresh_frame_stream() {
    let net = FakeNet::default();
    let bus = SerialBus::default();
    let mut master = connected_master(&net, &bus);

    let shared = SharedSlave::new(VoxelModuleGeometry::DEFAULT);
    let mut node = slave(0, &shared, &bus);

    net.send_to_slaves(&[0, TAG_WELCOME, 8]);
    net.send_to_slaves(&[0, TAG_WIPE_FRAME, 0x01, 0xf4, 5, 5, 5]);
    master.run(0);
    node.run(0);
    assert_eq!(shared.last_known_frame_id(), Some(500));

    // New connection, new counter: 300 is behind 500 and outside the reset window
    net.0.borrow_mut().connected = false;
    master.run(0);
    master.run(0);
    assert_eq!(master.state(), ConnectionState::Connected);
    assert_eq!(master.stats().replayed_welcomes, 1);

    net.send_to_slaves(&[0, TAG_WIPE_FRAME, 0x01, 0x2c, 6, 6, 6]);
    master.run(0);
    node.run(0);

    let stats = shared.stats();
    assert_eq!(stats.stale, 0);
    assert_eq!(stats.sessions, 3);
    assert_eq!(shared.last_known_frame_id(), Some(300));
    assert_eq!(shared.queued(), 1);

    assert!(node.run(REFRESH_INTERVAL_US));
    let level = gamma8(6);
    assert_eq!(node.strip().pixels[0], Rgb::new(level, level, level));
}
