//! TCP header codec
//!
//! This module provides parsing and emission of TCP headers, including
//! opaque options. The reserved nybble between the data offset and the flags
//! is emitted as zero.

use bytes::{BufMut, BytesMut};

use pktstack_core::{Error, Result};

/// TCP flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags {
    /// FIN - No more data from sender
    pub fin: bool,
    /// SYN - Synchronize sequence numbers
    pub syn: bool,
    /// RST - Reset the connection
    pub rst: bool,
    /// PSH - Push function
    pub psh: bool,
    /// ACK - Acknowledgment field is significant
    pub ack: bool,
    /// URG - Urgent pointer field is significant
    pub urg: bool,
    /// ECE - ECN-Echo
    pub ece: bool,
    /// CWR - Congestion Window Reduced
    pub cwr: bool,
}

impl TcpFlags {
    /// No flags set
    pub const NONE: TcpFlags = TcpFlags {
        fin: false,
        syn: false,
        rst: false,
        psh: false,
        ack: false,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// SYN flag (connection initiation)
    pub const SYN: TcpFlags = TcpFlags {
        fin: false,
        syn: true,
        rst: false,
        psh: false,
        ack: false,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// SYN+ACK flags (connection acknowledgment)
    pub const SYN_ACK: TcpFlags = TcpFlags {
        fin: false,
        syn: true,
        rst: false,
        psh: false,
        ack: true,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// ACK flag
    pub const ACK: TcpFlags = TcpFlags {
        fin: false,
        syn: false,
        rst: false,
        psh: false,
        ack: true,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// FIN+ACK flags (connection termination)
    pub const FIN_ACK: TcpFlags = TcpFlags {
        fin: true,
        syn: false,
        rst: false,
        psh: false,
        ack: true,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// RST flag (connection reset)
    pub const RST: TcpFlags = TcpFlags {
        fin: false,
        syn: false,
        rst: true,
        psh: false,
        ack: false,
        urg: false,
        ece: false,
        cwr: false,
    };

    /// Convert flags to u8 value
    pub fn to_u8(self) -> u8 {
        let mut flags = 0u8;
        if self.fin {
            flags |= 0b0000_0001;
        }
        if self.syn {
            flags |= 0b0000_0010;
        }
        if self.rst {
            flags |= 0b0000_0100;
        }
        if self.psh {
            flags |= 0b0000_1000;
        }
        if self.ack {
            flags |= 0b0001_0000;
        }
        if self.urg {
            flags |= 0b0010_0000;
        }
        if self.ece {
            flags |= 0b0100_0000;
        }
        if self.cwr {
            flags |= 0b1000_0000;
        }
        flags
    }

    /// Parse flags from u8 value
    pub fn from_u8(value: u8) -> Self {
        TcpFlags {
            fin: (value & 0b0000_0001) != 0,
            syn: (value & 0b0000_0010) != 0,
            rst: (value & 0b0000_0100) != 0,
            psh: (value & 0b0000_1000) != 0,
            ack: (value & 0b0001_0000) != 0,
            urg: (value & 0b0010_0000) != 0,
            ece: (value & 0b0100_0000) != 0,
            cwr: (value & 0b1000_0000) != 0,
        }
    }
}

/// TCP header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Sequence number
    pub sequence_number: u32,
    /// Acknowledgment number
    pub acknowledgment_number: u32,
    /// Data offset in 32-bit words (minimum 5)
    pub data_offset: u8,
    /// TCP flags
    pub flags: TcpFlags,
    /// Window size
    pub window_size: u16,
    /// Checksum
    pub checksum: u16,
    /// Urgent pointer
    pub urgent_pointer: u16,
    /// Options (if data_offset > 5), kept as opaque bytes of (data_offset - 5) * 4
    pub options: Vec<u8>,
}

impl TcpHeader {
    /// Minimum TCP header size (without options)
    pub const MIN_HEADER_SIZE: usize = 20;

    /// Maximum TCP header size (with maximum options)
    pub const MAX_HEADER_SIZE: usize = 60;

    /// Create a new TCP header
    pub fn new(
        source_port: u16,
        destination_port: u16,
        sequence_number: u32,
        acknowledgment_number: u32,
        flags: TcpFlags,
        window_size: u16,
    ) -> Self {
        TcpHeader {
            source_port,
            destination_port,
            sequence_number,
            acknowledgment_number,
            data_offset: 5,
            flags,
            window_size,
            checksum: 0,
            urgent_pointer: 0,
            options: Vec::new(),
        }
    }

    /// Set TCP options, padding to a 4-byte boundary and fixing the offset
    pub fn with_options(mut self, options: Vec<u8>) -> Self {
        let padded_len = (options.len() + 3) & !3;
        let mut padded = options;
        padded.resize(padded_len, 0);

        self.data_offset = ((Self::MIN_HEADER_SIZE + padded.len()) / 4) as u8;
        self.options = padded;
        self
    }

    /// Parse a TCP header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::MIN_HEADER_SIZE {
            return Err(Error::truncated("TCP", Self::MIN_HEADER_SIZE, data.len()));
        }

        let data_offset = data[12] >> 4;
        if data_offset < 5 {
            return Err(Error::parsing(format!(
                "TCP data offset {} below minimum",
                data_offset
            )));
        }

        let header_len = (data_offset as usize) * 4;
        if data.len() < header_len {
            return Err(Error::truncated("TCP", header_len, data.len()));
        }

        let header = TcpHeader {
            source_port: u16::from_be_bytes([data[0], data[1]]),
            destination_port: u16::from_be_bytes([data[2], data[3]]),
            sequence_number: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            acknowledgment_number: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
            data_offset,
            flags: TcpFlags::from_u8(data[13]),
            window_size: u16::from_be_bytes([data[14], data[15]]),
            checksum: u16::from_be_bytes([data[16], data[17]]),
            urgent_pointer: u16::from_be_bytes([data[18], data[19]]),
            options: data[Self::MIN_HEADER_SIZE..header_len].to_vec(),
        };
        Ok((header, &data[header_len..]))
    }

    /// Serialize the header to its wire form
    ///
    /// The stored checksum is written as-is; the reserved nybble is zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(Self::MIN_HEADER_SIZE + self.options.len());
        buffer.put_u16(self.source_port);
        buffer.put_u16(self.destination_port);
        buffer.put_u32(self.sequence_number);
        buffer.put_u32(self.acknowledgment_number);
        buffer.put_u8(self.data_offset << 4);
        buffer.put_u8(self.flags.to_u8());
        buffer.put_u16(self.window_size);
        buffer.put_u16(self.checksum);
        buffer.put_u16(self.urgent_pointer);
        buffer.put_slice(&self.options);
        buffer.to_vec()
    }

    /// Get the header size in bytes
    pub fn header_len(&self) -> usize {
        (self.data_offset as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_flags() {
        let flags = TcpFlags::SYN;
        assert_eq!(flags.to_u8(), 0b0000_0010);
        assert_eq!(TcpFlags::SYN_ACK.to_u8(), 0b0001_0010);

        let parsed = TcpFlags::from_u8(0b1100_0010);
        assert!(parsed.syn && parsed.ece && parsed.cwr);
        assert!(!parsed.ack);
    }

    #[test]
    fn test_parse() {
        let data = vec![
            0x30, 0x39, // source port 12345
            0x00, 0x50, // dest port 80
            0x00, 0x00, 0x03, 0xE8, // seq 1000
            0x00, 0x00, 0x07, 0xD0, // ack 2000
            0x50, // offset 5
            0x12, // SYN+ACK
            0xFF, 0xFF, // window
            0x1C, 0x2D, // checksum
            0x00, 0x00, // urgent pointer
            0x01, 0x02, // payload
        ];

        let (tcp, rest) = TcpHeader::parse(&data).unwrap();
        assert_eq!(tcp.source_port, 12345);
        assert_eq!(tcp.destination_port, 80);
        assert_eq!(tcp.sequence_number, 1000);
        assert_eq!(tcp.acknowledgment_number, 2000);
        assert_eq!(tcp.data_offset, 5);
        assert!(tcp.flags.syn && tcp.flags.ack);
        assert_eq!(tcp.checksum, 0x1C2D);
        assert_eq!(rest, &[0x01, 0x02]);
    }

    #[test]
    fn test_parse_options_length() {
        // offset 6 implies 4 bytes of options (MSS 1460)
        let data = vec![
            0xD4, 0x31, 0x00, 0x50, 0x00, 0x00, 0x03, 0xE8, 0x00, 0x00, 0x00, 0x00, 0x60, 0x02,
            0xFF, 0xFF, 0x3C, 0x07, 0x00, 0x00, 0x02, 0x04, 0x05, 0xB4,
        ];
        let (tcp, rest) = TcpHeader::parse(&data).unwrap();
        assert_eq!(tcp.data_offset, 6);
        assert_eq!(tcp.options, vec![0x02, 0x04, 0x05, 0xB4]);
        assert_eq!(tcp.options.len(), (tcp.data_offset as usize - 5) * 4);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_parse_offset_overruns_buffer() {
        let mut data = vec![0u8; 20];
        data[12] = 0x80; // offset 8 needs 32 bytes
        assert!(TcpHeader::parse(&data).unwrap_err().is_truncated());
    }

    #[test]
    fn test_with_options_pads_and_fixes_offset() {
        let tcp = TcpHeader::new(1, 2, 0, 0, TcpFlags::SYN, 1024).with_options(vec![0x02, 0x04]);
        assert_eq!(tcp.options.len(), 4);
        assert_eq!(tcp.data_offset, 6);
    }

    #[test]
    fn test_roundtrip() {
        let data = vec![
            0xD4, 0x31, 0x00, 0x50, 0x00, 0x00, 0x03, 0xE8, 0x00, 0x00, 0x00, 0x00, 0x60, 0x02,
            0xFF, 0xFF, 0x3C, 0x07, 0x00, 0x00, 0x02, 0x04, 0x05, 0xB4, 0xAA,
        ];
        let (tcp, rest) = TcpHeader::parse(&data).unwrap();
        let mut emitted = tcp.to_bytes();
        emitted.extend_from_slice(rest);
        assert_eq!(emitted, data);
    }
}
