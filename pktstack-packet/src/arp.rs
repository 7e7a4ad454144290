//! ARP packet codec
//!
//! Covers the 28-byte IPv4-over-Ethernet form (hln 6, pln 4). The opcode is
//! kept as a raw value so frames carrying unknown operations survive a
//! parse/emit round trip.

use bytes::{BufMut, BytesMut};
use std::net::Ipv4Addr;

use pktstack_core::{Error, MacAddr, Result};

/// Hardware types
pub const HTYPE_ETHERNET: u16 = 1;

/// Protocol types
pub const PTYPE_IPV4: u16 = 0x0800;

/// ARP operation codes
pub const OP_REQUEST: u16 = 1;
pub const OP_REPLY: u16 = 2;

/// ARP packet (IPv4 over Ethernet)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpHeader {
    /// Hardware type (1 for Ethernet)
    pub hardware_type: u16,
    /// Protocol type (0x0800 for IPv4)
    pub protocol_type: u16,
    /// Hardware address length (6 for MAC)
    pub hardware_len: u8,
    /// Protocol address length (4 for IPv4)
    pub protocol_len: u8,
    /// Operation
    pub op: u16,
    /// Sender hardware address
    pub sender_mac: MacAddr,
    /// Sender protocol address
    pub sender_ip: Ipv4Addr,
    /// Target hardware address
    pub target_mac: MacAddr,
    /// Target protocol address
    pub target_ip: Ipv4Addr,
}

impl ArpHeader {
    /// ARP packet size for IPv4 over Ethernet
    pub const HEADER_SIZE: usize = 28;

    /// Create an ARP request
    pub fn request(sender_mac: MacAddr, sender_ip: Ipv4Addr, target_ip: Ipv4Addr) -> Self {
        Self {
            hardware_type: HTYPE_ETHERNET,
            protocol_type: PTYPE_IPV4,
            hardware_len: 6,
            protocol_len: 4,
            op: OP_REQUEST,
            sender_mac,
            sender_ip,
            target_mac: MacAddr::zero(),
            target_ip,
        }
    }

    /// Create an ARP reply
    pub fn reply(
        sender_mac: MacAddr,
        sender_ip: Ipv4Addr,
        target_mac: MacAddr,
        target_ip: Ipv4Addr,
    ) -> Self {
        Self {
            hardware_type: HTYPE_ETHERNET,
            protocol_type: PTYPE_IPV4,
            hardware_len: 6,
            protocol_len: 4,
            op: OP_REPLY,
            sender_mac,
            sender_ip,
            target_mac,
            target_ip,
        }
    }

    /// Parse an ARP packet, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::truncated("ARP", Self::HEADER_SIZE, data.len()));
        }

        let mut sender_mac = [0u8; 6];
        sender_mac.copy_from_slice(&data[8..14]);
        let mut target_mac = [0u8; 6];
        target_mac.copy_from_slice(&data[18..24]);

        let header = ArpHeader {
            hardware_type: u16::from_be_bytes([data[0], data[1]]),
            protocol_type: u16::from_be_bytes([data[2], data[3]]),
            hardware_len: data[4],
            protocol_len: data[5],
            op: u16::from_be_bytes([data[6], data[7]]),
            sender_mac: MacAddr(sender_mac),
            sender_ip: Ipv4Addr::new(data[14], data[15], data[16], data[17]),
            target_mac: MacAddr(target_mac),
            target_ip: Ipv4Addr::new(data[24], data[25], data[26], data[27]),
        };
        Ok((header, &data[Self::HEADER_SIZE..]))
    }

    /// Serialize the packet to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE);
        buffer.put_u16(self.hardware_type);
        buffer.put_u16(self.protocol_type);
        buffer.put_u8(self.hardware_len);
        buffer.put_u8(self.protocol_len);
        buffer.put_u16(self.op);
        buffer.put_slice(self.sender_mac.as_bytes());
        buffer.put_slice(&self.sender_ip.octets());
        buffer.put_slice(self.target_mac.as_bytes());
        buffer.put_slice(&self.target_ip.octets());
        buffer.to_vec()
    }
}
