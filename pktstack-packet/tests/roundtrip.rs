//! Structural properties: truncation totality, round trips, emit invariants

use std::net::Ipv4Addr;

use pktstack_packet::ethernet::{EtherType, EthernetHeader};
use pktstack_packet::ipv4::{IpProtocol, Ipv4Header};
use pktstack_packet::mpls::{MplsHeader, MplsLabel, MplsMode};
use pktstack_packet::udp::UdpHeader;
use pktstack_packet::{decapsulate, encapsulate, is_truncated, Header, MacAddr};

fn icmp_echo_frame() -> Vec<u8> {
    vec![
        0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00, 0x45,
        0x00, 0x00, 0x20, 0x12, 0x34, 0x40, 0x00, 0x40, 0x01, 0x14, 0xA7, 0x0A, 0x00, 0x00, 0x01,
        0x0A, 0x00, 0x00, 0x02, 0x08, 0x00, 0x19, 0x2D, 0x00, 0x01, 0x00, 0x01, 0x70, 0x69, 0x6E,
        0x67,
    ]
}

#[test]
fn every_prefix_decapsulates_to_a_terminated_stack() {
    let frame = icmp_echo_frame();
    // ICMP body ends at byte 42; the rest is echo payload
    let payload_start = 42;

    for k in 0..frame.len() {
        let packet = decapsulate(&frame[..k]);
        let last = packet.last().expect("stack never empty");
        assert!(last.is_terminal(), "prefix {} must end in a terminal", k);
        if k < payload_start {
            assert!(is_truncated(&packet), "prefix {} cuts a header", k);
        } else {
            assert!(matches!(last, Header::Payload(_)));
        }
    }
}

#[test]
fn arbitrary_bytes_never_panic() {
    // a deterministic pseudo-random walk over byte soup
    let mut state: u32 = 0x2545F491;
    let mut soup = Vec::with_capacity(512);
    for _ in 0..512 {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        soup.push((state >> 16) as u8);
    }

    for start in 0..64 {
        let packet = decapsulate(&soup[start..]);
        assert!(packet.last().unwrap().is_terminal());
    }
}

#[test]
fn truncated_remainder_is_preserved_verbatim() {
    let frame = icmp_echo_frame();
    let cut = &frame[..30]; // inside the IPv4 header
    let packet = decapsulate(cut);
    assert_eq!(packet[1], Header::Truncated(cut[14..].to_vec()));
}

#[test]
fn decapsulated_ipv4_options_match_header_length() {
    let frame = vec![
        0x46, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00, 0x00, 0x40, 0xFF, 0x62, 0xE4, 0x0A, 0x00, 0x00,
        0x01, 0x0A, 0x00, 0x00, 0x02, // ihl 6
        0x01, 0x01, 0x01, 0x00, // NOP NOP NOP EOL
    ];
    let (ip, rest) = Ipv4Header::parse(&frame).unwrap();
    assert_eq!(ip.options.len(), (ip.ihl as usize - 5) * 4);
    assert!(rest.is_empty());

    let mut emitted = ip.to_bytes();
    emitted.extend_from_slice(rest);
    assert_eq!(emitted, frame);
}

#[test]
fn emitted_mpls_stack_sets_exactly_one_bottom_bit() {
    let packet = vec![
        Header::Ethernet(EthernetHeader::new(
            MacAddr([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
            MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            EtherType::MplsUnicast,
        )),
        Header::Mpls(MplsHeader {
            mode: MplsMode::Unicast,
            labels: vec![
                MplsLabel::new(16, 64),
                MplsLabel::new(17, 64),
                MplsLabel::new(18, 64),
            ],
            ethertype: EtherType::IPv4,
        }),
        Header::Ipv4(Ipv4Header::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
            IpProtocol::UDP,
        )),
        Header::Udp(UdpHeader::new(7, 7, 0)),
        Header::Payload(vec![]),
    ];

    let frame = encapsulate(&packet).unwrap();
    let bottom_bits: Vec<bool> = (0..3)
        .map(|i| frame[14 + i * 4 + 2] & 0x01 != 0)
        .collect();
    assert_eq!(bottom_bits, vec![false, false, true]);
}

#[test]
fn decapsulate_then_encapsulate_is_identity() {
    let frames: Vec<Vec<u8>> = vec![
        icmp_echo_frame(),
        // Ethernet + IPv4 + UDP
        {
            let mut f = vec![
                0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08,
                0x00,
            ];
            f.extend_from_slice(&[
                0x45, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11, 0x66, 0xCB, 0x0A,
                0x00, 0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
            ]);
            f.extend_from_slice(&[
                0x30, 0x39, 0x00, 0x35, 0x00, 0x0C, 0x1D, 0xC8, 0xDE, 0xAD, 0xBE, 0xEF,
            ]);
            f
        },
        // Ethernet + 802.1Q + ARP
        {
            let mut f = vec![
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x81,
                0x00, 0x20, 0x64, 0x08, 0x06,
            ];
            f.extend_from_slice(&[
                0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE,
                0xFF, 0x0A, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0A, 0x00,
                0x00, 0x02,
            ]);
            f
        },
    ];

    for frame in frames {
        let packet = decapsulate(&frame);
        assert!(matches!(packet.last(), Some(Header::Payload(_))));
        assert_eq!(encapsulate(&packet).unwrap(), frame);
    }
}
