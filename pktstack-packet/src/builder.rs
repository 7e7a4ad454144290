//! Packet encapsulation
//!
//! The dual of the layer dispatcher: a header stack is serialized inner to
//! outer, each layer's wire form prepended to the bytes built so far. Three
//! rewrites happen on the way out:
//!
//! - Ethernet, 802.1Q and MPLS type fields are set from the kind of the
//!   layer just serialized inside them; an unrecognized inner layer leaves
//!   the stored value untouched.
//! - IP headers take their protocol and length fields from the inner layer,
//!   and IPv4 recomputes its header checksum.
//! - Transport checksums are recomputed against the nearest enclosing IP
//!   header; ICMPv4 checksums cover the message and everything inside it.

use tracing::debug;

use crate::checksum;
use crate::ethernet::EtherType;
use crate::ipv4::{IpProtocol, Ipv4Header};
use crate::mpls::MplsMode;
use crate::packet::Header;
use pktstack_core::{ipproto, Error, Result};

/// Serialize a header stack into a wire frame
///
/// The stack is outer-to-inner and must end in a terminal (`Payload`,
/// `Unsupported` or `Truncated`), as produced by decapsulation.
pub fn encapsulate(packet: &[Header]) -> Result<Vec<u8>> {
    let (terminal, headers) = packet
        .split_last()
        .ok_or_else(|| Error::construction("cannot encapsulate an empty packet"))?;

    let mut built = terminal
        .terminal_bytes()
        .ok_or_else(|| Error::construction("packet must end in a payload or sentinel"))?
        .to_vec();

    let mut inner: Option<&Header> = None;
    for (i, header) in headers.iter().enumerate().rev() {
        let mut bytes = emit_layer(header, &built, inner, &headers[..i])?;
        bytes.extend_from_slice(&built);
        built = bytes;
        inner = Some(header);
    }

    debug!(layers = packet.len(), bytes = built.len(), "encapsulated packet");
    Ok(built)
}

/// Serialize one layer, applying the outbound rewrites
fn emit_layer(
    header: &Header,
    built: &[u8],
    inner: Option<&Header>,
    outer: &[Header],
) -> Result<Vec<u8>> {
    match header {
        Header::Ethernet(eth) => {
            let mut h = eth.clone();
            if let Some(ethertype) = ether_type_of(inner) {
                h.ethertype = ethertype;
            }
            Ok(h.to_bytes())
        }
        Header::Dot1q(tag) => {
            let mut h = *tag;
            if let Some(ethertype) = ether_type_of(inner) {
                h.ethertype = ethertype;
            }
            Ok(h.to_bytes())
        }
        Header::Mpls(mpls) => {
            let mut h = mpls.clone();
            if let Some(ethertype) = ether_type_of(inner) {
                h.ethertype = ethertype;
            }
            Ok(h.to_bytes())
        }
        Header::Ipv4(ip) => {
            let mut h = ip.clone();
            if let Some(protocol) = ip_protocol_of(inner) {
                // options padded to a word boundary, header length refreshed
                let padded = (h.options.len() + 3) & !3;
                h.options.resize(padded, 0);
                h.ihl = ((Ipv4Header::MIN_HEADER_SIZE + h.options.len()) / 4) as u8;
                h.total_length = (h.header_len() + built.len()) as u16;
                h.protocol = protocol;
                h.checksum = checksum::ipv4_makesum(&h);
            }
            Ok(h.to_bytes())
        }
        Header::Ipv6(ip) => {
            let mut h = ip.clone();
            if let Some(protocol) = ip_protocol_of(inner) {
                h.payload_length = built.len() as u16;
                h.next_header = protocol;
            }
            Ok(h.to_bytes())
        }
        Header::Tcp(tcp) => {
            let mut h = tcp.clone();
            match enclosing_ip(outer) {
                Some(Header::Ipv4(ip)) => {
                    h.checksum = 0;
                    let mut segment = h.to_bytes();
                    segment.extend_from_slice(built);
                    h.checksum = 0xFFFF
                        - checksum::transport_checksum_v4(
                            ip.source,
                            ip.destination,
                            ipproto::TCP,
                            segment.len() as u16,
                            &segment,
                        );
                }
                Some(Header::Ipv6(ip)) => {
                    h.checksum = 0;
                    let mut segment = h.to_bytes();
                    segment.extend_from_slice(built);
                    h.checksum = 0xFFFF
                        - checksum::transport_checksum_v6(
                            ip.source,
                            ip.destination,
                            ipproto::TCP,
                            segment.len() as u32,
                            &segment,
                        );
                }
                _ => {}
            }
            Ok(h.to_bytes())
        }
        Header::Udp(udp) => {
            let mut h = *udp;
            match enclosing_ip(outer) {
                Some(Header::Ipv4(ip)) => {
                    h.checksum = 0;
                    let mut segment = h.to_bytes();
                    segment.extend_from_slice(built);
                    h.checksum = 0xFFFF
                        - checksum::transport_checksum_v4(
                            ip.source,
                            ip.destination,
                            ipproto::UDP,
                            h.length,
                            &segment,
                        );
                }
                Some(Header::Ipv6(ip)) => {
                    h.checksum = 0;
                    let mut segment = h.to_bytes();
                    segment.extend_from_slice(built);
                    h.checksum = 0xFFFF
                        - checksum::transport_checksum_v6(
                            ip.source,
                            ip.destination,
                            ipproto::UDP,
                            h.length as u32,
                            &segment,
                        );
                }
                _ => {}
            }
            Ok(h.to_bytes())
        }
        Header::Icmp(icmp) => {
            let mut h = *icmp;
            h.checksum = 0;
            let mut message = h.to_bytes();
            message.extend_from_slice(built);
            h.checksum = checksum::makesum(&message);
            Ok(h.to_bytes())
        }
        Header::Icmpv6(icmp) => {
            let mut h = *icmp;
            if let Some(Header::Ipv6(ip)) = enclosing_ip(outer) {
                h.checksum = 0;
                let mut message = h.to_bytes();
                message.extend_from_slice(built);
                h.checksum = 0xFFFF
                    - checksum::transport_checksum_v6(
                        ip.source,
                        ip.destination,
                        ipproto::ICMPV6,
                        message.len() as u32,
                        &message,
                    );
            }
            Ok(h.to_bytes())
        }
        Header::Arp(arp) => Ok(arp.to_bytes()),
        Header::Gre(gre) => Ok(gre.to_bytes()),
        Header::Sctp(sctp) => Ok(sctp.to_bytes()),
        Header::Null(null) => Ok(null.to_bytes()),
        Header::LinuxSll(sll) => Ok(sll.to_bytes()),
        Header::Payload(_) | Header::Unsupported(_) | Header::Truncated(_) => Err(
            Error::construction("terminal entry before the end of the stack"),
        ),
    }
}

/// The ether type naming a layer, for outbound type-field rewrites
fn ether_type_of(header: Option<&Header>) -> Option<EtherType> {
    match header? {
        Header::Ipv4(_) => Some(EtherType::IPv4),
        Header::Ipv6(_) => Some(EtherType::IPv6),
        Header::Arp(_) => Some(EtherType::ARP),
        Header::Dot1q(_) => Some(EtherType::Dot1q),
        Header::Mpls(mpls) => Some(match mpls.mode {
            MplsMode::Unicast => EtherType::MplsUnicast,
            MplsMode::Multicast => EtherType::MplsMulticast,
        }),
        _ => None,
    }
}

/// The IP protocol naming a layer, for outbound protocol-field rewrites
fn ip_protocol_of(header: Option<&Header>) -> Option<IpProtocol> {
    match header? {
        Header::Icmp(_) => Some(IpProtocol::ICMP),
        Header::Tcp(_) => Some(IpProtocol::TCP),
        Header::Udp(_) => Some(IpProtocol::UDP),
        Header::Gre(_) => Some(IpProtocol::GRE),
        Header::Icmpv6(_) => Some(IpProtocol::ICMPv6),
        Header::Sctp(_) => Some(IpProtocol::SCTP),
        _ => None,
    }
}

/// Nearest enclosing IP header, searching outward from the current layer
fn enclosing_ip(outer: &[Header]) -> Option<&Header> {
    outer
        .iter()
        .rev()
        .find(|h| matches!(h, Header::Ipv4(_) | Header::Ipv6(_)))
}
