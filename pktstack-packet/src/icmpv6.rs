//! ICMPv6 header codec
//!
//! Only the 4-byte type/code/checksum prefix is structured; the message body
//! stays in the packet tail.

use bytes::{BufMut, BytesMut};

use pktstack_core::{Error, Result};

/// ICMPv6 message types
pub const DEST_UNREACHABLE: u8 = 1;
pub const PACKET_TOO_BIG: u8 = 2;
pub const TIME_EXCEEDED: u8 = 3;
pub const PARAMETER_PROBLEM: u8 = 4;
pub const ECHO_REQUEST: u8 = 128;
pub const ECHO_REPLY: u8 = 129;
pub const NEIGHBOR_SOLICITATION: u8 = 135;
pub const NEIGHBOR_ADVERTISEMENT: u8 = 136;

/// ICMPv6 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icmpv6Header {
    /// Message type
    pub icmp_type: u8,
    /// Message code
    pub code: u8,
    /// Checksum over the pseudo-header and the whole message
    pub checksum: u16,
}

impl Icmpv6Header {
    /// ICMPv6 header size in bytes
    pub const HEADER_SIZE: usize = 4;

    /// Create a new header with a zero checksum
    pub fn new(icmp_type: u8, code: u8) -> Self {
        Self {
            icmp_type,
            code,
            checksum: 0,
        }
    }

    /// Parse an ICMPv6 header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::truncated("ICMPv6", Self::HEADER_SIZE, data.len()));
        }

        let header = Icmpv6Header {
            icmp_type: data[0],
            code: data[1],
            checksum: u16::from_be_bytes([data[2], data[3]]),
        };
        Ok((header, &data[Self::HEADER_SIZE..]))
    }

    /// Serialize the header to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE);
        buffer.put_u8(self.icmp_type);
        buffer.put_u8(self.code);
        buffer.put_u16(self.checksum);
        buffer.to_vec()
    }
}
