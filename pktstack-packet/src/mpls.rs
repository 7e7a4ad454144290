//! MPLS label stack codec
//!
//! A label stack follows an outer header whose type field was 0x8847 or
//! 0x8848. Entries are consumed until the one carrying the bottom-of-stack
//! bit; the two bytes after the stack name the encapsulated protocol.
//!
//! Entry format:
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                Label                  | Exp |S|       TTL     |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use bytes::{BufMut, BytesMut};

use crate::ethernet::EtherType;
use pktstack_core::{ethertypes, Error, Result};

/// Size of one label stack entry in bytes
pub const ENTRY_SIZE: usize = 4;

/// Unicast or multicast label stack, as announced by the outer tag
///
/// The distinction is not encoded in the stack itself; it is carried in from
/// the ether type that selected this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MplsMode {
    Unicast,
    Multicast,
}

impl MplsMode {
    /// The ether type announcing a stack of this mode
    pub fn ether_type(self) -> u16 {
        match self {
            MplsMode::Unicast => ethertypes::MPLS_UNICAST,
            MplsMode::Multicast => ethertypes::MPLS_MULTICAST,
        }
    }
}

/// One MPLS label stack entry
///
/// The three EXP bits are carried as separate flags; the bottom-of-stack bit
/// is not stored at all and is reconstructed from position on emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MplsLabel {
    /// Label value (20 bits)
    pub label: u32,
    /// QoS bit (EXP bit 2)
    pub qos: bool,
    /// Priority bit (EXP bit 1)
    pub pri: bool,
    /// ECN bit (EXP bit 0)
    pub ecn: bool,
    /// Time to Live (8 bits)
    pub ttl: u8,
}

impl MplsLabel {
    /// Create a new label entry
    pub fn new(label: u32, ttl: u8) -> Self {
        Self {
            label: label & 0xFFFFF,
            qos: false,
            pri: false,
            ecn: false,
            ttl,
        }
    }

    fn decode(entry: u32) -> (Self, bool) {
        let label = MplsLabel {
            label: entry >> 12,
            qos: (entry & 0x0800) != 0,
            pri: (entry & 0x0400) != 0,
            ecn: (entry & 0x0200) != 0,
            ttl: (entry & 0xFF) as u8,
        };
        let bottom = (entry & 0x0100) != 0;
        (label, bottom)
    }

    fn encode(&self, bottom: bool) -> u32 {
        ((self.label & 0xFFFFF) << 12)
            | ((self.qos as u32) << 11)
            | ((self.pri as u32) << 10)
            | ((self.ecn as u32) << 9)
            | ((bottom as u32) << 8)
            | (self.ttl as u32)
    }
}

/// MPLS label stack header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MplsHeader {
    /// Stack mode from the announcing ether type
    pub mode: MplsMode,
    /// Label entries, outermost first
    pub labels: Vec<MplsLabel>,
    /// EtherType of the encapsulated protocol
    pub ethertype: EtherType,
}

impl MplsHeader {
    /// Parse a label stack, returning it and the unconsumed suffix
    ///
    /// Entries are read until the bottom-of-stack bit; running out of bytes
    /// before it (or before the trailing ether type) is a truncation.
    pub fn parse(mode: MplsMode, data: &[u8]) -> Result<(Self, &[u8])> {
        let mut labels = Vec::new();
        let mut offset = 0;

        loop {
            if data.len() < offset + ENTRY_SIZE {
                return Err(Error::truncated("MPLS", offset + ENTRY_SIZE, data.len()));
            }
            let entry = u32::from_be_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ]);
            let (label, bottom) = MplsLabel::decode(entry);
            labels.push(label);
            offset += ENTRY_SIZE;
            if bottom {
                break;
            }
        }

        if data.len() < offset + 2 {
            return Err(Error::truncated("MPLS", offset + 2, data.len()));
        }
        let ethertype = EtherType::from_u16(u16::from_be_bytes([data[offset], data[offset + 1]]));

        let header = MplsHeader {
            mode,
            labels,
            ethertype,
        };
        Ok((header, &data[offset + 2..]))
    }

    /// Serialize the stack to its wire form
    ///
    /// The bottom-of-stack bit is set on the last entry only, regardless of
    /// how the stack was assembled.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(self.labels.len() * ENTRY_SIZE + 2);
        let last = self.labels.len().saturating_sub(1);
        for (i, label) in self.labels.iter().enumerate() {
            buffer.put_u32(label.encode(i == last));
        }
        buffer.put_u16(self.ethertype.to_u16());
        buffer.to_vec()
    }
}
