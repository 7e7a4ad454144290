//! BSD loopback (DLT_NULL) codec
//!
//! The frame starts with a 4-byte address family written by the capturing
//! host in its own byte order, the single non-network-order field in the
//! codec. Frames shorter than 16 bytes are rejected as truncated, matching
//! the capture tooling's minimum.

use pktstack_core::{Error, Result};

/// BSD loopback header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullHeader {
    /// Address family of the encapsulated packet, host byte order
    pub family: u32,
}

impl NullHeader {
    /// Family word size in bytes
    pub const HEADER_SIZE: usize = 4;

    /// Shortest loopback frame the codec accepts
    pub const MIN_FRAME_SIZE: usize = 16;

    /// Create a new loopback header
    pub fn new(family: u32) -> Self {
        Self { family }
    }

    /// Parse a loopback header, returning it and the unconsumed suffix
    pub fn parse(data: &[u8]) -> Result<(Self, &[u8])> {
        if data.len() < Self::MIN_FRAME_SIZE {
            return Err(Error::truncated("loopback", Self::MIN_FRAME_SIZE, data.len()));
        }

        let family = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        Ok((NullHeader { family }, &data[Self::HEADER_SIZE..]))
    }

    /// Serialize the header to its wire form (host byte order)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.family.to_ne_bytes().to_vec()
    }
}
