//! UDP header codec

use bytes::{BufMut, BytesMut};

use pktstack_core::{Error, Result};

/// UDP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Length (header + data), carried verbatim
    pub length: u16,
    /// Checksum
    pub checksum: u16,
}

impl UdpHeader {
    /// UDP header size in bytes
    pub const HEADER_SIZE: usize = 8;

    /// Create a new UDP header for a payload of the given size
    pub fn new(source_port: u16, destination_port: u16, payload_len: u16) -> Self {
        UdpHeader {
            source_port,
            destination_port,
            length: Self::HEADER_SIZE as u16 + payload_len,
            checksum: 0,
        }
    }

    /// Parse a UDP header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::HEADER_SIZE {
            return Err(Error::truncated("UDP", Self::HEADER_SIZE, data.len()));
        }

        let header = UdpHeader {
            source_port: u16::from_be_bytes([data[0], data[1]]),
            destination_port: u16::from_be_bytes([data[2], data[3]]),
            length: u16::from_be_bytes([data[4], data[5]]),
            checksum: u16::from_be_bytes([data[6], data[7]]),
        };
        Ok((header, &data[Self::HEADER_SIZE..]))
    }

    /// Serialize the header to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::HEADER_SIZE);
        buffer.put_u16(self.source_port);
        buffer.put_u16(self.destination_port);
        buffer.put_u16(self.length);
        buffer.put_u16(self.checksum);
        buffer.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let data = vec![
            0x13, 0x88, // source port 5000
            0x00, 0x35, // dest port 53
            0x00, 0x10, // length 16
            0xDE, 0xF8, // checksum
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
        ];

        let (udp, rest) = UdpHeader::parse(&data).unwrap();
        assert_eq!(udp.source_port, 5000);
        assert_eq!(udp.destination_port, 53);
        assert_eq!(udp.length, 16);
        assert_eq!(udp.checksum, 0xDEF8);
        assert_eq!(rest.len(), 8);
    }

    #[test]
    fn test_parse_short() {
        assert!(UdpHeader::parse(&[0x13, 0x88, 0x00]).unwrap_err().is_truncated());
    }

    #[test]
    fn test_new_length() {
        let udp = UdpHeader::new(5000, 53, 8);
        assert_eq!(udp.length, 16);
    }

    #[test]
    fn test_roundtrip() {
        let udp = UdpHeader {
            source_port: 68,
            destination_port: 67,
            length: 308,
            checksum: 0xABCD,
        };
        let bytes = udp.to_bytes();
        let (parsed, rest) = UdpHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, udp);
        assert!(rest.is_empty());
    }
}
