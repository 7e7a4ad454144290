//! Layer dispatcher
//!
//! Decapsulation walks a frame from the outermost framing inward. Each step
//! parses one header, then picks the next parser from the protocol or type
//! field it just read. Transport headers are terminal: whatever follows them
//! becomes the payload. A codec failure terminates the walk with a
//! `Truncated` sentinel, an unrecognized protocol with `Unsupported`; no
//! input ever produces an error.

use tracing::trace;

use crate::arp::ArpHeader;
use crate::ethernet::EthernetHeader;
use crate::gre::GreHeader;
use crate::icmp::IcmpHeader;
use crate::icmpv6::Icmpv6Header;
use crate::ipv4::Ipv4Header;
use crate::ipv6::Ipv6Header;
use crate::loopback::NullHeader;
use crate::mpls::{MplsHeader, MplsMode};
use crate::packet::{Header, Packet};
use crate::sctp::SctpHeader;
use crate::sll::LinuxSllHeader;
use crate::tcp::TcpHeader;
use crate::udp::UdpHeader;
use crate::vlan::Dot1qHeader;
use pktstack_core::{ethertypes, family, ipproto, LinkType, Result};

/// Parser selector: which codec the dispatcher invokes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Proto {
    Null,
    LinuxSll,
    Ethernet,
    Dot1q,
    Mpls(MplsMode),
    Arp,
    Ipv4,
    Ipv6,
    Gre,
    Tcp,
    Udp,
    Sctp,
    Icmp,
    Icmpv6,
    /// Remaining bytes are the payload
    Raw,
    /// Remaining bytes belong to a protocol without a codec
    Unsupported,
}

impl Proto {
    /// Next parser for an ether type read from an Ethernet, SLL, VLAN, MPLS
    /// or GRE header
    pub(crate) fn from_ether_type(value: u16) -> Proto {
        match value {
            ethertypes::IPV4 => Proto::Ipv4,
            ethertypes::IPV6 => Proto::Ipv6,
            ethertypes::ARP => Proto::Arp,
            ethertypes::DOT1Q => Proto::Dot1q,
            ethertypes::MPLS_UNICAST => Proto::Mpls(MplsMode::Unicast),
            ethertypes::MPLS_MULTICAST => Proto::Mpls(MplsMode::Multicast),
            _ => Proto::Unsupported,
        }
    }

    /// Next parser for an IPv4 protocol or IPv6 next-header byte
    pub(crate) fn from_ip_protocol(value: u8) -> Proto {
        match value {
            ipproto::ICMP => Proto::Icmp,
            ipproto::TCP => Proto::Tcp,
            ipproto::UDP => Proto::Udp,
            ipproto::GRE => Proto::Gre,
            ipproto::ICMPV6 => Proto::Icmpv6,
            ipproto::SCTP => Proto::Sctp,
            ipproto::RAW => Proto::Raw,
            _ => Proto::Unsupported,
        }
    }

    /// Next parser for a loopback address family
    pub(crate) fn from_family(value: u32) -> Proto {
        match value {
            family::PF_INET => Proto::Ipv4,
            family::PF_INET6 => Proto::Ipv6,
            _ => Proto::Unsupported,
        }
    }

    /// Initial parser for a capture's datalink type
    pub(crate) fn from_link_type(link_type: LinkType) -> Proto {
        match link_type {
            LinkType::Null => Proto::Null,
            LinkType::En10mb => Proto::Ethernet,
            LinkType::LinuxSll => Proto::LinuxSll,
            LinkType::Raw => Proto::Ipv4,
            _ => Proto::Unsupported,
        }
    }
}

/// Decapsulate a frame, assuming Ethernet framing
pub fn decapsulate(data: &[u8]) -> Packet {
    run(Proto::Ethernet, data)
}

/// Decapsulate a frame captured with the given datalink type
pub fn decapsulate_dlt(link_type: LinkType, data: &[u8]) -> Packet {
    run(Proto::from_link_type(link_type), data)
}

/// Decapsulate a frame captured with the given pcap DLT code
///
/// A code outside the DLT table yields an `Unsupported` stack.
pub fn decapsulate_code(code: u32, data: &[u8]) -> Packet {
    match LinkType::from_u32(code) {
        Some(link_type) => decapsulate_dlt(link_type, data),
        None => vec![Header::Unsupported(data.to_vec())],
    }
}

fn run(mut proto: Proto, mut data: &[u8]) -> Packet {
    let mut layers: Packet = Vec::new();

    loop {
        let step: Result<(Header, Proto, &[u8])> = match proto {
            Proto::Null => NullHeader::parse(data).map(|(h, rest)| {
                let next = Proto::from_family(h.family);
                (Header::Null(h), next, rest)
            }),
            Proto::LinuxSll => LinuxSllHeader::parse(data).map(|(h, rest)| {
                let next = Proto::from_ether_type(h.protocol);
                (Header::LinuxSll(h), next, rest)
            }),
            Proto::Ethernet => EthernetHeader::parse(data).map(|(h, rest)| {
                let next = Proto::from_ether_type(h.ethertype.to_u16());
                (Header::Ethernet(h), next, rest)
            }),
            Proto::Dot1q => Dot1qHeader::parse(data).map(|(h, rest)| {
                let next = Proto::from_ether_type(h.ethertype.to_u16());
                (Header::Dot1q(h), next, rest)
            }),
            Proto::Mpls(mode) => MplsHeader::parse(mode, data).map(|(h, rest)| {
                let next = Proto::from_ether_type(h.ethertype.to_u16());
                (Header::Mpls(h), next, rest)
            }),
            Proto::Ipv4 => Ipv4Header::parse(data).map(|(h, rest)| {
                let next = Proto::from_ip_protocol(h.protocol.to_u8());
                (Header::Ipv4(h), next, rest)
            }),
            Proto::Ipv6 => Ipv6Header::parse(data).map(|(h, rest)| {
                let next = Proto::from_ip_protocol(h.next_header.to_u8());
                (Header::Ipv6(h), next, rest)
            }),
            Proto::Gre => GreHeader::parse(data).map(|(h, rest)| {
                let next = Proto::from_ether_type(h.protocol_type.to_u16());
                (Header::Gre(h), next, rest)
            }),
            Proto::Arp => ArpHeader::parse(data).map(|(h, rest)| (Header::Arp(h), Proto::Raw, rest)),
            Proto::Tcp => TcpHeader::parse(data).map(|(h, rest)| (Header::Tcp(h), Proto::Raw, rest)),
            Proto::Udp => UdpHeader::parse(data).map(|(h, rest)| (Header::Udp(h), Proto::Raw, rest)),
            Proto::Sctp => {
                SctpHeader::parse(data).map(|(h, rest)| (Header::Sctp(h), Proto::Raw, rest))
            }
            Proto::Icmp => {
                IcmpHeader::parse(data).map(|(h, rest)| (Header::Icmp(h), Proto::Raw, rest))
            }
            Proto::Icmpv6 => {
                Icmpv6Header::parse(data).map(|(h, rest)| (Header::Icmpv6(h), Proto::Raw, rest))
            }
            Proto::Raw => {
                layers.push(Header::Payload(data.to_vec()));
                return layers;
            }
            Proto::Unsupported => {
                trace!(depth = layers.len(), "no codec for remaining bytes");
                layers.push(Header::Unsupported(data.to_vec()));
                return layers;
            }
        };

        match step {
            Ok((header, next, rest)) => {
                layers.push(header);
                proto = next;
                data = rest;
            }
            Err(err) => {
                trace!(%err, depth = layers.len(), "layer parse stopped");
                layers.push(Header::Truncated(data.to_vec()));
                return layers;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethernet::EtherType;
    use crate::ipv4::IpProtocol;

    fn icmp_echo_frame() -> Vec<u8> {
        vec![
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00,
            0x45, 0x00, 0x00, 0x20, 0x12, 0x34, 0x40, 0x00, 0x40, 0x01, 0x14, 0xA7, 0x0A, 0x00,
            0x00, 0x01, 0x0A, 0x00, 0x00, 0x02, 0x08, 0x00, 0x19, 0x2D, 0x00, 0x01, 0x00, 0x01,
            0x70, 0x69, 0x6E, 0x67,
        ]
    }

    #[test]
    fn test_decapsulate_icmp_echo() {
        let packet = decapsulate(&icmp_echo_frame());
        assert_eq!(packet.len(), 4);
        assert!(matches!(packet[0], Header::Ethernet(_)));
        assert!(matches!(packet[1], Header::Ipv4(_)));
        assert!(matches!(packet[2], Header::Icmp(_)));
        assert_eq!(packet[3], Header::Payload(b"ping".to_vec()));
    }

    #[test]
    fn test_unknown_ether_type_is_unsupported() {
        let mut frame = icmp_echo_frame();
        frame[12] = 0x88;
        frame[13] = 0xCC; // LLDP, no codec
        let packet = decapsulate(&frame);
        assert_eq!(packet.len(), 2);
        assert!(matches!(packet[1], Header::Unsupported(_)));
    }

    #[test]
    fn test_unknown_ip_protocol_is_unsupported() {
        let mut frame = icmp_echo_frame();
        frame[23] = 89; // OSPF, no codec
        frame[24..26].copy_from_slice(&[0x14, 0x4F]); // keep the header sum correct
        let packet = decapsulate(&frame);
        assert!(matches!(packet[0], Header::Ethernet(_)));
        assert!(matches!(packet[1], Header::Ipv4(_)));
        assert!(matches!(packet[2], Header::Unsupported(_)));
    }

    #[test]
    fn test_raw_protocol_terminates_with_payload() {
        let mut frame = icmp_echo_frame();
        frame[23] = 255;
        let packet = decapsulate(&frame);
        assert!(matches!(packet[1], Header::Ipv4(_)));
        assert_eq!(packet.len(), 3);
        assert!(matches!(packet[2], Header::Payload(_)));
    }

    #[test]
    fn test_truncated_mid_ip() {
        let frame = icmp_echo_frame();
        let packet = decapsulate(&frame[..20]);
        assert_eq!(packet.len(), 2);
        assert!(matches!(packet[0], Header::Ethernet(_)));
        assert_eq!(packet[1], Header::Truncated(frame[14..20].to_vec()));
    }

    #[test]
    fn test_decapsulate_dlt_raw_ip() {
        let frame = &icmp_echo_frame()[14..];
        let packet = decapsulate_dlt(LinkType::Raw, frame);
        assert!(matches!(packet[0], Header::Ipv4(_)));
        assert!(matches!(packet[1], Header::Icmp(_)));
    }

    #[test]
    fn test_decapsulate_dlt_unsupported() {
        let packet = decapsulate_dlt(LinkType::Fddi, &[0u8; 32]);
        assert_eq!(packet.len(), 1);
        assert!(matches!(packet[0], Header::Unsupported(_)));
    }

    #[test]
    fn test_decapsulate_code() {
        let frame = icmp_echo_frame();
        let packet = decapsulate_code(1, &frame);
        assert_eq!(packet.len(), 4);

        let packet = decapsulate_code(200, &frame);
        assert_eq!(packet, vec![Header::Unsupported(frame)]);
    }

    #[test]
    fn test_vlan_tag_dispatch() {
        let mut frame = vec![
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x81, 0x00,
            0x00, 0x64, 0x08, 0x06, // VLAN 100 then ARP
        ];
        frame.extend_from_slice(&[
            0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF,
            0x0A, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x02,
        ]);

        let packet = decapsulate(&frame);
        assert_eq!(packet.len(), 4);
        match &packet[0] {
            Header::Ethernet(eth) => assert_eq!(eth.ethertype, EtherType::Dot1q),
            other => panic!("expected Ethernet, got {:?}", other),
        }
        match &packet[1] {
            Header::Dot1q(tag) => {
                assert_eq!(tag.vlan_id, 100);
                assert_eq!(tag.ethertype, EtherType::ARP);
            }
            other => panic!("expected 802.1Q, got {:?}", other),
        }
        assert!(matches!(packet[2], Header::Arp(_)));
        assert_eq!(packet[3], Header::Payload(vec![]));
    }

    #[test]
    fn test_gre_dispatch() {
        // IPv4 in GRE in IPv4, one tunnel level
        let mut frame = vec![
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00,
        ];
        // outer IPv4: proto 47, len 20 + 4 + 20 = 44
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x40, 0x2F, 0x66, 0xA1, 0x0A, 0x00,
            0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
        ]);
        frame.extend_from_slice(&[0x00, 0x00, 0x08, 0x00]); // GRE carrying IPv4
        // inner IPv4: proto 255, len 20
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0xFF, 0xF8, 0x97, 0xC0, 0xA8,
            0x00, 0x01, 0xC0, 0xA8, 0x00, 0x02,
        ]);

        let packet = decapsulate(&frame);
        assert_eq!(packet.len(), 5);
        assert!(matches!(packet[1], Header::Ipv4(_)));
        assert!(matches!(packet[2], Header::Gre(_)));
        match &packet[3] {
            Header::Ipv4(ip) => assert_eq!(ip.protocol, IpProtocol::Raw),
            other => panic!("expected inner IPv4, got {:?}", other),
        }
        assert_eq!(packet[4], Header::Payload(vec![]));
    }

    #[test]
    fn test_sctp_dispatch() {
        let mut frame = vec![
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00,
        ];
        // IPv4, proto 132, total length 52
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x34, 0x00, 0x00, 0x00, 0x00, 0x40, 0x84, 0x66, 0x44, 0x0A, 0x00,
            0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
        ]);
        // SCTP common header plus one padded DATA chunk
        frame.extend_from_slice(&[
            0x1F, 0x90, 0x00, 0x50, 0x00, 0x00, 0x00, 0x2A, 0x12, 0x34, 0x56, 0x78, 0x00, 0x03,
            0x00, 0x13, 0x00, 0x00, 0x00, 0x01, 0x00, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xCC, 0x00,
        ]);

        let packet = decapsulate(&frame);
        assert_eq!(packet.len(), 4);
        match &packet[2] {
            Header::Sctp(sctp) => {
                assert_eq!(sctp.source_port, 8080);
                assert_eq!(sctp.chunks.len(), 1);
            }
            other => panic!("expected SCTP, got {:?}", other),
        }
        assert_eq!(packet[3], Header::Payload(vec![]));
    }

    #[test]
    fn test_icmpv6_dispatch() {
        let mut frame = vec![
            0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x86, 0xDD,
        ];
        frame.extend_from_slice(&[0x60, 0x00, 0x00, 0x00, 0x00, 0x08, 0x3A, 0xFF]);
        frame.extend_from_slice(&std::net::Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1).octets());
        frame.extend_from_slice(&std::net::Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2).octets());
        frame.extend_from_slice(&[0x80, 0x00, 0x82, 0xB2, 0x00, 0x01, 0x00, 0x05]);

        let packet = decapsulate(&frame);
        assert_eq!(packet.len(), 4);
        match &packet[2] {
            Header::Icmpv6(icmp) => assert_eq!(icmp.icmp_type, crate::icmpv6::ECHO_REQUEST),
            other => panic!("expected ICMPv6, got {:?}", other),
        }
        assert_eq!(packet[3], Header::Payload(vec![0x00, 0x01, 0x00, 0x05]));
    }

    #[test]
    fn test_loopback_dispatch() {
        let mut frame = pktstack_core::family::PF_INET.to_ne_bytes().to_vec();
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0xFF, 0x7B, 0xE9, 0x7F, 0x00,
            0x00, 0x01, 0x7F, 0x00, 0x00, 0x01,
        ]);

        let packet = decapsulate_dlt(LinkType::Null, &frame);
        assert!(matches!(packet[0], Header::Null(_)));
        assert!(matches!(packet[1], Header::Ipv4(_)));
    }

    #[test]
    fn test_linux_sll_dispatch() {
        let mut frame = vec![
            0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x00,
            0x08, 0x00,
        ];
        frame.extend_from_slice(&[
            0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x40, 0xFF, 0xF8, 0x97, 0xC0, 0xA8,
            0x00, 0x01, 0xC0, 0xA8, 0x00, 0x02,
        ]);

        let packet = decapsulate_dlt(LinkType::LinuxSll, &frame);
        assert!(matches!(packet[0], Header::LinuxSll(_)));
        assert!(matches!(packet[1], Header::Ipv4(_)));
    }
}
