//! IPv4 header codec
//!
//! This module provides parsing and emission of IPv4 headers, including
//! opaque options. Emission writes the stored checksum verbatim; checksums
//! are recomputed only when a packet stack is encapsulated.

use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

use pktstack_core::{ipproto, Error, Result};

/// IP protocol numbers understood by the layer dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProtocol {
    /// IPv4 encapsulation (0)
    IP,
    /// ICMP (1)
    ICMP,
    /// TCP (6)
    TCP,
    /// UDP (17)
    UDP,
    /// IPv6 encapsulation (41)
    IPv6,
    /// GRE (47)
    GRE,
    /// ICMPv6 (58)
    ICMPv6,
    /// SCTP (132)
    SCTP,
    /// Raw payload (255)
    Raw,
    /// Any other protocol number
    Custom(u8),
}

impl IpProtocol {
    /// Convert IpProtocol to u8 value
    pub fn to_u8(self) -> u8 {
        match self {
            IpProtocol::IP => ipproto::IP,
            IpProtocol::ICMP => ipproto::ICMP,
            IpProtocol::TCP => ipproto::TCP,
            IpProtocol::UDP => ipproto::UDP,
            IpProtocol::IPv6 => ipproto::IPV6,
            IpProtocol::GRE => ipproto::GRE,
            IpProtocol::ICMPv6 => ipproto::ICMPV6,
            IpProtocol::SCTP => ipproto::SCTP,
            IpProtocol::Raw => ipproto::RAW,
            IpProtocol::Custom(val) => val,
        }
    }

    /// Create IpProtocol from u8 value
    pub fn from_u8(value: u8) -> Self {
        match value {
            ipproto::IP => IpProtocol::IP,
            ipproto::ICMP => IpProtocol::ICMP,
            ipproto::TCP => IpProtocol::TCP,
            ipproto::UDP => IpProtocol::UDP,
            ipproto::IPV6 => IpProtocol::IPv6,
            ipproto::GRE => IpProtocol::GRE,
            ipproto::ICMPV6 => IpProtocol::ICMPv6,
            ipproto::SCTP => IpProtocol::SCTP,
            ipproto::RAW => IpProtocol::Raw,
            val => IpProtocol::Custom(val),
        }
    }
}

/// IP flags
///
/// The reserved bit preceding DF is not stored; it is emitted as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IpFlags {
    /// Don't Fragment flag
    pub dont_fragment: bool,
    /// More Fragments flag
    pub more_fragments: bool,
}

impl IpFlags {
    /// No flags set
    pub const NONE: IpFlags = IpFlags {
        dont_fragment: false,
        more_fragments: false,
    };

    /// Don't Fragment flag set
    pub const DONT_FRAGMENT: IpFlags = IpFlags {
        dont_fragment: true,
        more_fragments: false,
    };

    /// Convert to 3-bit value
    pub fn to_u8(self) -> u8 {
        let mut flags = 0u8;
        if self.dont_fragment {
            flags |= 0b010;
        }
        if self.more_fragments {
            flags |= 0b001;
        }
        flags
    }

    /// Parse from 3-bit value, dropping the reserved bit
    pub fn from_u8(value: u8) -> Self {
        IpFlags {
            dont_fragment: (value & 0b010) != 0,
            more_fragments: (value & 0b001) != 0,
        }
    }
}

/// IPv4 header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ipv4Header {
    /// Version (always 4 for IPv4)
    pub version: u8,
    /// Internet Header Length in 32-bit words (minimum 5)
    pub ihl: u8,
    /// Type of Service / DSCP
    pub tos: u8,
    /// Total length (header + data) in bytes
    pub total_length: u16,
    /// Identification
    pub id: u16,
    /// Flags
    pub flags: IpFlags,
    /// Fragment offset (in 8-byte blocks)
    pub fragment_offset: u16,
    /// Time to Live
    pub ttl: u8,
    /// Protocol
    pub protocol: IpProtocol,
    /// Header checksum
    pub checksum: u16,
    /// Source IP address
    pub source: Ipv4Addr,
    /// Destination IP address
    pub destination: Ipv4Addr,
    /// Options (if IHL > 5), kept as opaque bytes of (ihl - 5) * 4
    pub options: Vec<u8>,
}

impl Ipv4Header {
    /// Minimum IPv4 header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    /// Maximum IPv4 header size (with maximum options)
    pub const MAX_HEADER_SIZE: usize = 60;

    /// Create a new IPv4 header with default values
    pub fn new(source: Ipv4Addr, destination: Ipv4Addr, protocol: IpProtocol) -> Self {
        Ipv4Header {
            version: 4,
            ihl: 5,
            tos: 0,
            total_length: Self::MIN_HEADER_SIZE as u16,
            id: 0,
            flags: IpFlags::DONT_FRAGMENT,
            fragment_offset: 0,
            ttl: 64,
            protocol,
            checksum: 0,
            source,
            destination,
            options: Vec::new(),
        }
    }

    /// Set the Time to Live
    pub fn with_ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the identification field
    pub fn with_id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    /// Parse an IPv4 header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return Err(Error::truncated("IPv4", Self::MIN_HEADER_SIZE, data.len()));
        }

        let version = data[0] >> 4;
        let ihl = data[0] & 0x0F;
        if version != 4 {
            return Err(Error::parsing(format!("IPv4 version nybble is {}", version)));
        }
        if ihl < 5 {
            return Err(Error::parsing(format!("IPv4 header length {} below minimum", ihl)));
        }

        let header_len = (ihl as usize) * 4;
        if data.len() < header_len {
            return Err(Error::truncated("IPv4", header_len, data.len()));
        }

        let flags_and_offset = u16::from_be_bytes([data[6], data[7]]);

        let header = Ipv4Header {
            version,
            ihl,
            tos: data[1],
            total_length: u16::from_be_bytes([data[2], data[3]]),
            id: u16::from_be_bytes([data[4], data[5]]),
            flags: IpFlags::from_u8((flags_and_offset >> 13) as u8),
            fragment_offset: flags_and_offset & 0x1FFF,
            ttl: data[8],
            protocol: IpProtocol::from_u8(data[9]),
            checksum: u16::from_be_bytes([data[10], data[11]]),
            source: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            destination: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
            options: data[Self::MIN_HEADER_SIZE..header_len].to_vec(),
        };
        Ok((header, &data[header_len..]))
    }

    /// Serialize the header to its wire form
    ///
    /// The stored checksum is written as-is.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::MIN_HEADER_SIZE + self.options.len());
        buffer.put_u8((self.version << 4) | (self.ihl & 0x0F));
        buffer.put_u8(self.tos);
        buffer.put_u16(self.total_length);
        buffer.put_u16(self.id);
        buffer.put_u16(((self.flags.to_u8() as u16) << 13) | (self.fragment_offset & 0x1FFF));
        buffer.put_u8(self.ttl);
        buffer.put_u8(self.protocol.to_u8());
        buffer.put_u16(self.checksum);
        buffer.put_slice(&self.source.octets());
        buffer.put_slice(&self.destination.octets());
        buffer.put_slice(&self.options);
        buffer.to_vec()
    }

    /// Get the header size in bytes
    pub fn header_len(&self) -> usize {
        (self.ihl as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_protocol_conversion() {
        assert_eq!(IpProtocol::TCP.to_u8(), 6);
        assert_eq!(IpProtocol::SCTP.to_u8(), 132);
        assert_eq!(IpProtocol::from_u8(58), IpProtocol::ICMPv6);
        assert_eq!(IpProtocol::from_u8(89), IpProtocol::Custom(89));
    }

    #[test]
    fn test_ip_flags_reserved_dropped() {
        let flags = IpFlags::from_u8(0b111);
        assert!(flags.dont_fragment);
        assert!(flags.more_fragments);
        assert_eq!(flags.to_u8(), 0b011);
    }

    #[test]
    fn test_parse() {
        let data = vec![
            0x45, 0x00, 0x00, 0x20, // v4, ihl 5, len 32
            0x12, 0x34, 0x40, 0x00, // id, DF
            0x40, 0x01, 0x14, 0xA7, // ttl 64, ICMP, checksum
            0x0A, 0x00, 0x00, 0x01, // 10.0.0.1
            0x0A, 0x00, 0x00, 0x02, // 10.0.0.2
            0xDE, 0xAD, // payload
        ];

        let (ip, rest) = Ipv4Header::parse(&data).unwrap();
        assert_eq!(ip.version, 4);
        assert_eq!(ip.ihl, 5);
        assert_eq!(ip.total_length, 32);
        assert!(ip.flags.dont_fragment);
        assert_eq!(ip.fragment_offset, 0);
        assert_eq!(ip.protocol, IpProtocol::ICMP);
        assert_eq!(ip.source, Ipv4Addr::new(10, 0, 0, 1));
        assert!(ip.options.is_empty());
        assert_eq!(rest, &[0xDE, 0xAD]);
    }

    #[test]
    fn test_parse_options_length() {
        // ihl 7 implies 8 bytes of options
        let mut data = vec![
            0x47, 0x00, 0x00, 0x24, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00, 0x0A, 0x00,
            0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
        ];
        data.extend_from_slice(&[0x94, 0x04, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00]);
        data.extend_from_slice(&[0xFF]);

        let (ip, rest) = Ipv4Header::parse(&data).unwrap();
        assert_eq!(ip.ihl, 7);
        assert_eq!(ip.options.len(), (ip.ihl as usize - 5) * 4);
        assert_eq!(rest, &[0xFF]);
    }

    #[test]
    fn test_parse_ihl_overruns_buffer() {
        // ihl 7 but only 20 bytes available
        let data = vec![
            0x47, 0x00, 0x00, 0x24, 0x00, 0x00, 0x00, 0x00, 0x40, 0x11, 0x00, 0x00, 0x0A, 0x00,
            0x00, 0x01, 0x0A, 0x00, 0x00, 0x02,
        ];
        assert!(Ipv4Header::parse(&data).unwrap_err().is_truncated());
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let mut data = vec![0u8; 20];
        data[0] = 0x65;
        assert!(Ipv4Header::parse(&data).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let data = vec![
            0x45, 0x00, 0x00, 0x2C, 0x00, 0x01, 0x40, 0x00, 0x40, 0x06, 0xB7, 0x15, 0xC0, 0xA8,
            0x01, 0x64, 0xC0, 0xA8, 0x01, 0x01, 0xAA, 0xBB,
        ];
        let (ip, rest) = Ipv4Header::parse(&data).unwrap();
        let mut emitted = ip.to_bytes();
        emitted.extend_from_slice(rest);
        assert_eq!(emitted, data);
    }
}
