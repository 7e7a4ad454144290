//! 802.1Q VLAN tag codec
//!
//! An 802.1Q tag follows an outer header whose type field was 0x8100; the
//! four bytes parsed here are the TCI followed by the inner ether type.

use bytes::{BufMut, BytesMut};

use crate::ethernet::EtherType;
use pktstack_core::{Error, Result};

/// Size of the tag body in bytes (2 TCI + 2 inner ether type)
pub const TAG_SIZE: usize = 4;

/// VLAN ID mask (12 bits)
const VLAN_ID_MASK: u16 = 0x0FFF;

/// Priority mask (3 bits, shifted left 13)
const PRIORITY_MASK: u16 = 0xE000;

/// DEI/CFI mask (1 bit, bit 12)
const DEI_MASK: u16 = 0x1000;

/// 802.1Q VLAN tag
///
/// TCI (Tag Control Information) format:
/// ```text
/// | PCP (3 bits) | DEI (1 bit) | VID (12 bits) |
/// |   Priority   | Drop Eligible |   VLAN ID    |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot1qHeader {
    /// Priority Code Point (0-7)
    pub priority: u8,
    /// Drop Eligible Indicator
    pub dei: bool,
    /// VLAN Identifier (12 bits)
    pub vlan_id: u16,
    /// EtherType of the encapsulated protocol
    pub ethertype: EtherType,
}

impl Dot1qHeader {
    /// Create a new tag with default priority 0 and DEI clear
    pub fn new(vlan_id: u16, ethertype: EtherType) -> Self {
        Self {
            priority: 0,
            dei: false,
            vlan_id: vlan_id & VLAN_ID_MASK,
            ethertype,
        }
    }

    /// Parse a tag body, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < TAG_SIZE {
            return Err(Error::truncated("802.1Q", TAG_SIZE, data.len()));
        }

        let tci = u16::from_be_bytes([data[0], data[1]]);
        let header = Dot1qHeader {
            priority: ((tci & PRIORITY_MASK) >> 13) as u8,
            dei: (tci & DEI_MASK) != 0,
            vlan_id: tci & VLAN_ID_MASK,
            ethertype: EtherType::from_u16(u16::from_be_bytes([data[2], data[3]])),
        };
        Ok((header, &data[TAG_SIZE..]))
    }

    /// Serialize the tag body to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let tci = ((self.priority as u16) << 13 & PRIORITY_MASK)
            | if self.dei { DEI_MASK } else { 0 }
            | (self.vlan_id & VLAN_ID_MASK);

        let mut buffer = BytesMut::with_capacity(TAG_SIZE);
        buffer.put_u16(tci);
        buffer.put_u16(self.ethertype.to_u16());
        buffer.to_vec()
    }
}
