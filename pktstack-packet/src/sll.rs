//! Linux cooked capture (DLT_LINUX_SLL) codec
//!
//! The 16-byte v1 header written by `tcpdump -i any`: packet type, ARPHRD
//! hardware type, link-layer address length and 8 address bytes, then a
//! protocol field carrying an ether type.

use bytes::{BufMut, BytesMut};

use pktstack_core::{Error, Result};

/// Packet type values
pub const PACKET_HOST: u16 = 0;
pub const PACKET_BROADCAST: u16 = 1;
pub const PACKET_MULTICAST: u16 = 2;
pub const PACKET_OTHERHOST: u16 = 3;
pub const PACKET_OUTGOING: u16 = 4;

/// Linux cooked capture v1 header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinuxSllHeader {
    /// Where the packet was headed relative to the capturing host
    pub packet_type: u16,
    /// ARPHRD hardware type of the originating interface
    pub hardware_type: u16,
    /// Meaningful octets in `link_layer_addr`
    pub link_layer_len: u16,
    /// Link-layer address, zero padded
    pub link_layer_addr: [u8; 8],
    /// Protocol of the encapsulated packet, compared as an ether type
    pub protocol: u16,
}

impl LinuxSllHeader {
    /// Cooked header size in bytes
    pub const HEADER_SIZE: usize = 16;

    /// Parse a cooked header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::truncated(
                "Linux cooked",
                Self::HEADER_SIZE,
                data.len(),
            ));
        }

        let mut link_layer_addr = [0u8; 8];
        link_layer_addr.copy_from_slice(&data[6..14]);

        let header = LinuxSllHeader {
            packet_type: u16::from_be_bytes([data[0], data[1]]),
            hardware_type: u16::from_be_bytes([data[2], data[3]]),
            link_layer_len: u16::from_be_bytes([data[4], data[5]]),
            link_layer_addr,
            protocol: u16::from_be_bytes([data[14], data[15]]),
        };
        Ok((header, &data[Self::HEADER_SIZE..]))
    }

    /// Serialize the header to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE);
        buffer.put_u16(self.packet_type);
        buffer.put_u16(self.hardware_type);
        buffer.put_u16(self.link_layer_len);
        buffer.put_slice(&self.link_layer_addr);
        buffer.put_u16(self.protocol);
        buffer.to_vec()
    }
}
