//! Example: Decoding a captured frame
//!
//! This example demonstrates how to use the pktstack-packet crate to walk
//! a captured Ethernet frame layer by layer.

use pktstack_packet::{decapsulate, Header};

fn main() {
    // An ICMP echo request, as captured from the wire
    let frame: Vec<u8> = vec![
        0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00, 0x45,
        0x00, 0x00, 0x20, 0x12, 0x34, 0x40, 0x00, 0x40, 0x01, 0x14, 0xA7, 0x0A, 0x00, 0x00, 0x01,
        0x0A, 0x00, 0x00, 0x02, 0x08, 0x00, 0x19, 0x2D, 0x00, 0x01, 0x00, 0x01, 0x70, 0x69, 0x6E,
        0x67,
    ];

    let packet = decapsulate(&frame);
    println!("Decoded {} layers:", packet.len());

    for header in &packet {
        match header {
            Header::Ethernet(eth) => {
                println!("  Ethernet  {} -> {} ({})", eth.source, eth.destination, eth.ethertype);
            }
            Header::Ipv4(ip) => {
                println!("  IPv4      {} -> {} ttl {}", ip.source, ip.destination, ip.ttl);
            }
            Header::Icmp(icmp) => {
                println!("  ICMP      type {} code {}", icmp.icmp_type, icmp.code);
            }
            Header::Payload(bytes) => {
                println!("  Payload   {} bytes", bytes.len());
            }
            other => {
                println!("  {:?}", other);
            }
        }
    }
}
