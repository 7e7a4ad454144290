//! SCTP packet codec
//!
//! Covers the common header and the chunk list. DATA chunks get a structured
//! payload; every other chunk type keeps its value bytes opaque. The checksum
//! is carried verbatim (SCTP uses CRC32c, which is outside the one's
//! complement engine).
//!
//! Chunks are aligned to 4 bytes on the wire; the padding is not part of the
//! chunk length field. Parsing skips it, emission restores it as zeros.

use bytes::{BufMut, BytesMut};

use pktstack_core::{Error, Result};

/// DATA chunk type
pub const CHUNK_DATA: u8 = 0;
/// INIT chunk type
pub const CHUNK_INIT: u8 = 1;
/// SACK chunk type
pub const CHUNK_SACK: u8 = 3;
/// HEARTBEAT chunk type
pub const CHUNK_HEARTBEAT: u8 = 4;

/// Size of the chunk type/flags/length prefix
const CHUNK_HEADER_SIZE: usize = 4;

/// Fixed part of a DATA chunk value (tsn, stream id, stream seq, proto id)
const DATA_FIXED_SIZE: usize = 12;

/// Chunk payload, structured for DATA chunks and opaque otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SctpChunkPayload {
    /// DATA chunk (type 0)
    Data {
        /// Transmission sequence number
        tsn: u32,
        /// Stream identifier
        stream_id: u16,
        /// Stream sequence number
        stream_seq: u16,
        /// Payload protocol identifier
        protocol_id: u32,
        /// User data, including any bytes past the structured part
        data: Vec<u8>,
    },
    /// Any other chunk type
    Raw(Vec<u8>),
}

/// One SCTP chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctpChunk {
    /// Chunk type
    pub chunk_type: u8,
    /// Chunk flags
    pub flags: u8,
    /// Value length in bytes, excluding the 4-byte chunk header
    pub length: u16,
    /// Chunk value
    pub payload: SctpChunkPayload,
}

impl SctpChunk {
    /// Bytes this chunk occupies on the wire, alignment padding included
    pub fn wire_len(&self) -> usize {
        (CHUNK_HEADER_SIZE + self.length as usize + 3) & !3
    }
}

/// SCTP packet: common header plus chunk list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SctpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
    /// Verification tag
    pub verification_tag: u32,
    /// CRC32c checksum, carried verbatim
    pub checksum: u32,
    /// Chunks in wire order
    pub chunks: Vec<SctpChunk>,
}

impl SctpHeader {
    /// Common header size in bytes
    pub const COMMON_HEADER_SIZE: usize = 12;

    /// Parse an SCTP packet, returning it and the unconsumed suffix
    ///
    /// Chunks consume the rest of the buffer, so the suffix is always empty
    /// on success.
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::COMMON_HEADER_SIZE {
            return Err(Error::truncated(
                "SCTP",
                Self::COMMON_HEADER_SIZE,
                data.len(),
            ));
        }

        let mut chunks = Vec::new();
        let mut offset = Self::COMMON_HEADER_SIZE;
        while offset < data.len() {
            let (chunk, consumed) = Self::parse_chunk(&data[offset..])?;
            chunks.push(chunk);
            offset += consumed;
        }

        let header = SctpHeader {
            source_port: u16::from_be_bytes([data[0], data[1]]),
            destination_port: u16::from_be_bytes([data[2], data[3]]),
            verification_tag: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            checksum: u32::from_be_bytes([data[8], data[9], data[10], data[11]]),
            chunks,
        };
        Ok((header, &data[data.len()..]))
    }

    fn parse_chunk(data: &[u8]) -> Result<(SctpChunk, usize)> {
        if data.len() < CHUNK_HEADER_SIZE {
            return Err(Error::truncated("SCTP chunk", CHUNK_HEADER_SIZE, data.len()));
        }

        let chunk_type = data[0];
        let flags = data[1];
        let wire_length = u16::from_be_bytes([data[2], data[3]]) as usize;
        if wire_length < CHUNK_HEADER_SIZE {
            return Err(Error::parsing(format!(
                "SCTP chunk length {} below minimum",
                wire_length
            )));
        }

        let value_len = wire_length - CHUNK_HEADER_SIZE;
        if data.len() < CHUNK_HEADER_SIZE + value_len {
            return Err(Error::truncated(
                "SCTP chunk",
                CHUNK_HEADER_SIZE + value_len,
                data.len(),
            ));
        }
        let value = &data[CHUNK_HEADER_SIZE..CHUNK_HEADER_SIZE + value_len];

        let payload = if chunk_type == CHUNK_DATA {
            if value_len < DATA_FIXED_SIZE {
                return Err(Error::parsing(format!(
                    "SCTP DATA chunk value of {} bytes below fixed part",
                    value_len
                )));
            }
            SctpChunkPayload::Data {
                tsn: u32::from_be_bytes([value[0], value[1], value[2], value[3]]),
                stream_id: u16::from_be_bytes([value[4], value[5]]),
                stream_seq: u16::from_be_bytes([value[6], value[7]]),
                protocol_id: u32::from_be_bytes([value[8], value[9], value[10], value[11]]),
                data: value[DATA_FIXED_SIZE..].to_vec(),
            }
        } else {
            SctpChunkPayload::Raw(value.to_vec())
        };

        // skip the alignment pad; a final unpadded chunk is accepted
        let padding = (4 - wire_length % 4) % 4;
        let consumed = (CHUNK_HEADER_SIZE + value_len + padding).min(data.len());

        let chunk = SctpChunk {
            chunk_type,
            flags,
            length: value_len as u16,
            payload,
        };
        Ok((chunk, consumed))
    }

    /// Serialize the packet to its wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = BytesMut::with_capacity(
            Self::COMMON_HEADER_SIZE + self.chunks.iter().map(SctpChunk::wire_len).sum::<usize>(),
        );
        buffer.put_u16(self.source_port);
        buffer.put_u16(self.destination_port);
        buffer.put_u32(self.verification_tag);
        buffer.put_u32(self.checksum);

        for chunk in &self.chunks {
            buffer.put_u8(chunk.chunk_type);
            buffer.put_u8(chunk.flags);
            buffer.put_u16(chunk.length + CHUNK_HEADER_SIZE as u16);
            match &chunk.payload {
                SctpChunkPayload::Data {
                    tsn,
                    stream_id,
                    stream_seq,
                    protocol_id,
                    data,
                } => {
                    buffer.put_u32(*tsn);
                    buffer.put_u16(*stream_id);
                    buffer.put_u16(*stream_seq);
                    buffer.put_u32(*protocol_id);
                    buffer.put_slice(data);
                }
                SctpChunkPayload::Raw(value) => buffer.put_slice(value),
            }
            let padding = (4 - (CHUNK_HEADER_SIZE + chunk.length as usize) % 4) % 4;
            buffer.put_bytes(0, padding);
        }
        buffer.to_vec()
    }
}
