//! GRE header codec
//!
//! Covers the RFC 2784 base header with the RFC 2890 checksum extension:
//! the checksum and second reserved word are present iff the C bit is set.
//! One level of GRE encapsulation is supported by the dispatcher.

use bytes::{BufMut, BytesMut};

use crate::ethernet::EtherType;
use pktstack_core::{Error, Result};

/// GRE header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreHeader {
    /// Checksum Present bit
    pub checksum_present: bool,
    /// Reserved0 (12 bits)
    pub reserved0: u16,
    /// Version (3 bits)
    pub version: u8,
    /// EtherType of the encapsulated protocol
    pub protocol_type: EtherType,
    /// Checksum over header and payload, present iff C is set
    pub checksum: Option<u16>,
    /// Reserved1, present iff C is set
    pub reserved1: Option<u16>,
}

impl GreHeader {
    /// Base header size without the checksum extension
    pub const MIN_HEADER_SIZE: usize = 4;

    /// Create a new GRE header without a checksum
    pub fn new(protocol_type: EtherType) -> Self {
        Self {
            checksum_present: false,
            reserved0: 0,
            version: 0,
            protocol_type,
            checksum: None,
            reserved1: None,
        }
    }

    /// Parse a GRE header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return Err(Error::truncated("GRE", Self::MIN_HEADER_SIZE, data.len()));
        }

        let word = u16::from_be_bytes([data[0], data[1]]);
        let checksum_present = (word & 0x8000) != 0;
        let protocol_type = EtherType::from_u16(u16::from_be_bytes([data[2], data[3]]));

        let (checksum, reserved1, consumed) = if checksum_present {
            if data.len() < 8 {
                return Err(Error::truncated("GRE", 8, data.len()));
            }
            (
                Some(u16::from_be_bytes([data[4], data[5]])),
                Some(u16::from_be_bytes([data[6], data[7]])),
                8,
            )
        } else {
            (None, None, Self::MIN_HEADER_SIZE)
        };

        let header = GreHeader {
            checksum_present,
            reserved0: (word >> 3) & 0x0FFF,
            version: (word & 0x07) as u8,
            protocol_type,
            checksum,
            reserved1,
        };
        Ok((header, &data[consumed..]))
    }

    /// Serialize the header to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let word = ((self.checksum_present as u16) << 15)
            | ((self.reserved0 & 0x0FFF) << 3)
            | (self.version as u16 & 0x07);

        let mut buffer = BytesMut::with_capacity(8);
        buffer.put_u16(word);
        buffer.put_u16(self.protocol_type.to_u16());
        if self.checksum_present {
            buffer.put_u16(self.checksum.unwrap_or(0));
            buffer.put_u16(self.reserved1.unwrap_or(0));
        }
        buffer.to_vec()
    }
}
