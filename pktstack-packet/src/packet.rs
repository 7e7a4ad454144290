//! Packet data model
//!
//! A decapsulated packet is an ordered list of headers, outermost first,
//! always ending in one of three terminals: the innermost payload bytes, an
//! `Unsupported` remainder the dispatcher could not interpret, or a
//! `Truncated` remainder a codec could not finish.

use crate::arp::ArpHeader;
use crate::ethernet::EthernetHeader;
use crate::gre::GreHeader;
use crate::icmp::IcmpHeader;
use crate::icmpv6::Icmpv6Header;
use crate::ipv4::Ipv4Header;
use crate::ipv6::Ipv6Header;
use crate::loopback::NullHeader;
use crate::mpls::MplsHeader;
use crate::sctp::SctpHeader;
use crate::sll::LinuxSllHeader;
use crate::tcp::TcpHeader;
use crate::udp::UdpHeader;
use crate::vlan::Dot1qHeader;

/// One parsed layer of a packet, or its terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    /// BSD loopback framing
    Null(NullHeader),
    /// Linux cooked capture framing
    LinuxSll(LinuxSllHeader),
    /// Ethernet II framing
    Ethernet(EthernetHeader),
    /// 802.1Q VLAN tag
    Dot1q(Dot1qHeader),
    /// MPLS label stack
    Mpls(MplsHeader),
    /// ARP
    Arp(ArpHeader),
    /// IPv4
    Ipv4(Ipv4Header),
    /// IPv6
    Ipv6(Ipv6Header),
    /// GRE tunnel
    Gre(GreHeader),
    /// TCP
    Tcp(TcpHeader),
    /// UDP
    Udp(UdpHeader),
    /// SCTP
    Sctp(SctpHeader),
    /// ICMPv4
    Icmp(IcmpHeader),
    /// ICMPv6
    Icmpv6(Icmpv6Header),
    /// Terminal: innermost payload bytes (possibly empty)
    Payload(Vec<u8>),
    /// Terminal: bytes of a protocol the dispatcher does not recognize
    Unsupported(Vec<u8>),
    /// Terminal: bytes a codec could not finish parsing
    Truncated(Vec<u8>),
}

impl Header {
    /// True for the three terminal variants
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Header::Payload(_) | Header::Unsupported(_) | Header::Truncated(_)
        )
    }

    /// The bytes of a terminal variant
    pub fn terminal_bytes(&self) -> Option<&[u8]> {
        match self {
            Header::Payload(bytes) | Header::Unsupported(bytes) | Header::Truncated(bytes) => {
                Some(bytes)
            }
            _ => None,
        }
    }
}

/// A decapsulated packet: headers outer-to-inner, ending in a terminal
pub type Packet = Vec<Header>;

/// The innermost payload bytes, if the packet ends in a clean payload
pub fn payload(packet: &[Header]) -> Option<&[u8]> {
    match packet.last() {
        Some(Header::Payload(bytes)) => Some(bytes),
        _ => None,
    }
}

/// True when the packet ran out of bytes mid-header
pub fn is_truncated(packet: &[Header]) -> bool {
    matches!(packet.last(), Some(Header::Truncated(_)))
}
