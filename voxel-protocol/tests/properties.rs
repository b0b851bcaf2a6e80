//! Robustness of the byte-level parsers against arbitrary input

use core::net::Ipv4Addr;

use proptest::prelude::*;

use voxel_protocol::field::parse_decimal;
use voxel_protocol::{DiscoveryAck, IncomingPacket, RelayParser, UDP_DISCOVERY_PORT};

const LOCAL: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 17);
const SERVER: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 1);

proptest! {
    #[test]
    fn test_ack_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..40)) {
        let _ = DiscoveryAck::parse(&bytes, SERVER, LOCAL, UDP_DISCOVERY_PORT);
    }

    #[test]
    fn test_ack_accepts_own_address(server_port in any::<u16>()) {
        let text = DiscoveryAck::encode(LOCAL, UDP_DISCOVERY_PORT, server_port).unwrap();
        let ack = DiscoveryAck::parse(text.as_bytes(), SERVER, LOCAL, UDP_DISCOVERY_PORT).unwrap();
        prop_assert_eq!(ack.server_address, SERVER);
        prop_assert_eq!(ack.server_port, server_port);
    }

    #[test]
    fn test_ack_for_other_device_rejected(octet in any::<u8>(), port in any::<u16>()) {
        prop_assume!(octet != 17);
        let other = Ipv4Addr::new(192, 168, 0, octet);
        let text = DiscoveryAck::encode(other, UDP_DISCOVERY_PORT, port).unwrap();
        prop_assert!(DiscoveryAck::parse(text.as_bytes(), SERVER, LOCAL, UDP_DISCOVERY_PORT).is_err());
    }

    #[test]
    fn test_decimal_in_range(value in 0u32..=70_000) {
        let text = value.to_string();
        let parsed = parse_decimal(text.as_bytes(), u16::MAX as u32);
        if value <= u16::MAX as u32 {
            prop_assert_eq!(parsed, Some(value));
        } else {
            prop_assert_eq!(parsed, None);
        }
    }

    #[test]
    fn test_packet_parse_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
        if let Ok(packet) = IncomingPacket::parse(&bytes) {
            prop_assert_eq!(packet.slave_id, bytes[0]);
            prop_assert!(packet.payload.len() <= bytes.len() - 2);
        }
    }

    #[test]
    fn test_relay_recovers_after_garbage(
        garbage in proptest::collection::vec(any::<u8>(), 0..64),
        packet in proptest::collection::vec(any::<u8>(), 1..32),
    ) {
        let mut parser = RelayParser::<32>::new();
        for &b in &garbage {
            let _ = parser.feed(b);
        }
        parser.reset();

        let prefix = RelayParser::<32>::encode_prefix(&packet).unwrap();
        let mut out = None;
        for &b in prefix.iter().chain(packet.iter()) {
            if let Some(p) = parser.feed(b).unwrap() {
                out = Some(p.to_vec());
            }
        }
        prop_assert_eq!(out, Some(packet));
    }
}
