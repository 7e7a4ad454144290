//! Packet codec library for pktstack
//!
//! This crate parses raw frames captured from a link into a stack of
//! structured per-layer headers, and symmetrically serializes such a stack
//! back into a byte-exact wire frame. It covers the common TCP/IP family
//! above the datalink framings used by capture tooling:
//!
//! - **Ethernet II**, **802.1Q** VLAN tags, **MPLS** label stacks
//! - **BSD loopback** and **Linux cooked** capture framing
//! - **ARP**, **IPv4** with options, **IPv6**, one level of **GRE**
//! - **TCP** with options, **UDP**, **SCTP** with chunked payloads,
//!   **ICMPv4** by message type, **ICMPv6**
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`decap`] - the layer dispatcher, walking a frame outer to inner
//! - [`builder`] - encapsulation, rebuilding a frame with lengths, protocol
//!   tags and checksums refreshed
//! - [`packet`] - the [`Header`] stack model and its terminals
//! - [`checksum`] - the RFC 1071 one's-complement engine and pseudo-headers
//! - one codec module per header kind ([`ethernet`], [`ipv4`], [`tcp`], ...)
//!
//! # Quick Start
//!
//! ## Decoding a captured frame
//!
//! ```rust
//! use pktstack_packet::{decapsulate, Header};
//!
//! let frame: &[u8] = &[
//!     0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x08, 0x00,
//!     0x45, 0x00, 0x00, 0x20, 0x12, 0x34, 0x40, 0x00, 0x40, 0x01, 0x14, 0xA7, 0x0A, 0x00,
//!     0x00, 0x01, 0x0A, 0x00, 0x00, 0x02, 0x08, 0x00, 0x19, 0x2D, 0x00, 0x01, 0x00, 0x01,
//!     0x70, 0x69, 0x6E, 0x67,
//! ];
//!
//! let packet = decapsulate(frame);
//! match &packet[1] {
//!     Header::Ipv4(ip) => println!("{} -> {}", ip.source, ip.destination),
//!     other => panic!("expected IPv4, got {:?}", other),
//! }
//! ```
//!
//! ## Building a frame
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use pktstack_core::MacAddr;
//! use pktstack_packet::ethernet::{EtherType, EthernetHeader};
//! use pktstack_packet::ipv4::{IpProtocol, Ipv4Header};
//! use pktstack_packet::tcp::{TcpFlags, TcpHeader};
//! use pktstack_packet::{encapsulate, Header};
//!
//! let stack = vec![
//!     Header::Ethernet(EthernetHeader::new(
//!         MacAddr([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]),
//!         MacAddr([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
//!         EtherType::IPv4,
//!     )),
//!     Header::Ipv4(Ipv4Header::new(
//!         Ipv4Addr::new(192, 168, 1, 100),
//!         Ipv4Addr::new(192, 168, 1, 1),
//!         IpProtocol::TCP,
//!     )),
//!     Header::Tcp(TcpHeader::new(54321, 80, 1000, 0, TcpFlags::SYN, 65535)),
//!     Header::Payload(vec![]),
//! ];
//!
//! // lengths, protocol tags and checksums are filled in on the way out
//! let frame = encapsulate(&stack).unwrap();
//! assert_eq!(frame.len(), 54);
//! ```
//!
//! # Guarantees
//!
//! - **Total decapsulation**: every byte sequence decapsulates into a stack
//!   ending in payload bytes, `Unsupported`, or `Truncated`; malformed input
//!   never raises an error.
//! - **Round trips**: for any accepted header, emitting it reproduces the
//!   consumed bytes; a stack decapsulated without sentinels re-encapsulates
//!   to the original frame when its checksums were already valid.
//! - **Purity**: no I/O, no global state; buffers are borrowed read-only and
//!   outputs are freshly owned.

pub mod arp;
pub mod builder;
pub mod checksum;
pub mod decap;
pub mod ethernet;
pub mod gre;
pub mod icmp;
pub mod icmpv6;
pub mod ipv4;
pub mod ipv6;
pub mod loopback;
pub mod mpls;
pub mod packet;
pub mod sctp;
pub mod sll;
pub mod tcp;
pub mod udp;
pub mod vlan;

// Re-export commonly used types
pub use builder::encapsulate;
pub use checksum::{checksum, makesum, valid};
pub use decap::{decapsulate, decapsulate_code, decapsulate_dlt};
pub use packet::{is_truncated, payload, Header, Packet};
pub use pktstack_core::{Error, LinkType, MacAddr, Result};
