//! Example: Building a TCP SYN frame
//!
//! This example demonstrates how to assemble a header stack and let
//! encapsulation fill in lengths, protocol tags and checksums.

use std::net::Ipv4Addr;

use pktstack_core::MacAddr;
use pktstack_packet::ethernet::{EtherType, EthernetHeader};
use pktstack_packet::ipv4::{IpProtocol, Ipv4Header};
use pktstack_packet::tcp::{TcpFlags, TcpHeader};
use pktstack_packet::{encapsulate, Header};

fn main() {
    let stack = vec![
        Header::Ethernet(EthernetHeader::new(
            MacAddr([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
            MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            EtherType::IPv4,
        )),
        Header::Ipv4(
            Ipv4Header::new(
                Ipv4Addr::new(192, 168, 1, 100),
                Ipv4Addr::new(192, 168, 1, 1),
                IpProtocol::TCP,
            )
            .with_ttl(64),
        ),
        Header::Tcp(
            TcpHeader::new(54321, 80, 1000, 0, TcpFlags::SYN, 65535)
                .with_options(vec![0x02, 0x04, 0x05, 0xB4]), // MSS 1460
        ),
        Header::Payload(vec![]),
    ];

    let frame = encapsulate(&stack).expect("Failed to build TCP SYN frame");

    println!("TCP SYN frame built successfully!");
    println!("Total size: {} bytes", frame.len());

    // The IPv4 total length and checksum were filled in on the way out
    println!(
        "IPv4 total length: {}",
        u16::from_be_bytes([frame[16], frame[17]])
    );
    println!(
        "TCP checksum: 0x{:04X}",
        u16::from_be_bytes([frame[34 + 16], frame[34 + 17]])
    );
}
