//! ICMPv4 packet codec
//!
//! The only codec with per-type body shapes: the four bytes after the
//! type/code/checksum prefix are interpreted according to the message type.
//! Payload bytes past the fixed body stay in the packet tail; timestamp and
//! information messages carry none.

use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

use pktstack_core::{Error, Result};

/// ICMP message types
pub const ECHO_REPLY: u8 = 0;
pub const DEST_UNREACHABLE: u8 = 3;
pub const SOURCE_QUENCH: u8 = 4;
pub const REDIRECT: u8 = 5;
pub const ECHO_REQUEST: u8 = 8;
pub const TIME_EXCEEDED: u8 = 11;
pub const PARAMETER_PROBLEM: u8 = 12;
pub const TIMESTAMP: u8 = 13;
pub const TIMESTAMP_REPLY: u8 = 14;
pub const INFO_REQUEST: u8 = 15;
pub const INFO_REPLY: u8 = 16;

/// Message body following the type/code/checksum prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpBody {
    /// Echo Request / Echo Reply (8, 0)
    Echo { id: u16, sequence: u16 },
    /// Destination Unreachable, Source Quench, Time Exceeded (3, 4, 11):
    /// an unused word, kept opaque
    Unused(u32),
    /// Parameter Problem (12): pointer plus a 24-bit unused field
    ParameterProblem { pointer: u8, unused: u32 },
    /// Redirect (5)
    Redirect { gateway: Ipv4Addr },
    /// Timestamp / Timestamp Reply (13, 14); terminal, no payload follows
    Timestamp {
        id: u16,
        sequence: u16,
        originate: u32,
        receive: u32,
        transmit: u32,
    },
    /// Information Request / Reply (15, 16); terminal, no payload follows
    Info { id: u16, sequence: u16 },
    /// Any other type: the body word, kept opaque
    Other(u32),
}

/// ICMPv4 packet header with its type-dependent body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpHeader {
    /// Message type
    pub icmp_type: u8,
    /// Message code
    pub code: u8,
    /// Checksum over the whole ICMP message
    pub checksum: u16,
    /// Type-dependent body
    pub body: IcmpBody,
}

impl IcmpHeader {
    /// Minimum ICMP message size (prefix plus one body word)
    pub const MIN_HEADER_SIZE: usize = 8;

    /// Size of a timestamp message
    pub const TIMESTAMP_SIZE: usize = 20;

    /// Create an Echo Request header; the payload travels in the packet tail
    pub fn echo_request(id: u16, sequence: u16) -> Self {
        Self {
            icmp_type: ECHO_REQUEST,
            code: 0,
            checksum: 0,
            body: IcmpBody::Echo { id, sequence },
        }
    }

    /// Parse an ICMP message, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return Err(Error::truncated("ICMP", Self::MIN_HEADER_SIZE, data.len()));
        }

        let icmp_type = data[0];
        let (body, consumed) = match icmp_type {
            ECHO_REQUEST | ECHO_REPLY => (
                IcmpBody::Echo {
                    id: u16::from_be_bytes([data[4], data[5]]),
                    sequence: u16::from_be_bytes([data[6], data[7]]),
                },
                Self::MIN_HEADER_SIZE,
            ),
            DEST_UNREACHABLE | SOURCE_QUENCH | TIME_EXCEEDED => (
                IcmpBody::Unused(u32::from_be_bytes([data[4], data[5], data[6], data[7]])),
                Self::MIN_HEADER_SIZE,
            ),
            PARAMETER_PROBLEM => (
                IcmpBody::ParameterProblem {
                    pointer: data[4],
                    unused: u32::from_be_bytes([0, data[5], data[6], data[7]]),
                },
                Self::MIN_HEADER_SIZE,
            ),
            REDIRECT => (
                IcmpBody::Redirect {
                    gateway: Ipv4Addr::new(data[4], data[5], data[6], data[7]),
                },
                Self::MIN_HEADER_SIZE,
            ),
            TIMESTAMP | TIMESTAMP_REPLY => {
                if data.len() < Self::TIMESTAMP_SIZE {
                    return Err(Error::truncated("ICMP", Self::TIMESTAMP_SIZE, data.len()));
                }
                (
                    IcmpBody::Timestamp {
                        id: u16::from_be_bytes([data[4], data[5]]),
                        sequence: u16::from_be_bytes([data[6], data[7]]),
                        originate: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
                        receive: u32::from_be_bytes([data[12], data[13], data[14], data[15]]),
                        transmit: u32::from_be_bytes([data[16], data[17], data[18], data[19]]),
                    },
                    Self::TIMESTAMP_SIZE,
                )
            }
            INFO_REQUEST | INFO_REPLY => (
                IcmpBody::Info {
                    id: u16::from_be_bytes([data[4], data[5]]),
                    sequence: u16::from_be_bytes([data[6], data[7]]),
                },
                Self::MIN_HEADER_SIZE,
            ),
            _ => (
                IcmpBody::Other(u32::from_be_bytes([data[4], data[5], data[6], data[7]])),
                Self::MIN_HEADER_SIZE,
            ),
        };

        let header = IcmpHeader {
            icmp_type,
            code: data[1],
            checksum: u16::from_be_bytes([data[2], data[3]]),
            body,
        };
        Ok((header, &data[consumed..]))
    }

    /// Serialize the message to its wire form
    ///
    /// The stored checksum is written as-is.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::TIMESTAMP_SIZE);
        buffer.put_u8(self.icmp_type);
        buffer.put_u8(self.code);
        buffer.put_u16(self.checksum);
        match self.body {
            IcmpBody::Echo { id, sequence } | IcmpBody::Info { id, sequence } => {
                buffer.put_u16(id);
                buffer.put_u16(sequence);
            }
            IcmpBody::Unused(word) | IcmpBody::Other(word) => buffer.put_u32(word),
            IcmpBody::ParameterProblem { pointer, unused } => {
                buffer.put_u8(pointer);
                buffer.put_u8((unused >> 16) as u8);
                buffer.put_u8((unused >> 8) as u8);
                buffer.put_u8(unused as u8);
            }
            IcmpBody::Redirect { gateway } => buffer.put_slice(&gateway.octets()),
            IcmpBody::Timestamp {
                id,
                sequence,
                originate,
                receive,
                transmit,
            } => {
                buffer.put_u16(id);
                buffer.put_u16(sequence);
                buffer.put_u32(originate);
                buffer.put_u32(receive);
                buffer.put_u32(transmit);
            }
        }
        buffer.to_vec()
    }
}
