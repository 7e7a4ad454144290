//! Internet checksum engine (RFC 1071)
//!
//! The primitive is the 16-bit one's-complement sum with end-around carry,
//! taken over big-endian words with an odd trailing byte padded by zero bits.
//! `checksum` returns that folded sum: a buffer whose stored checksum field
//! is correct sums to 0xFFFF, which is what [`valid`] tests. The value to
//! store in a header is the complement, produced by [`makesum`].
//!
//! Pseudo-header forms for the transport protocols are built here; deciding
//! *when* to recompute them is the encapsulation builder's job.

use bytes::{BufMut, BytesMut};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::ipv4::Ipv4Header;

/// One's-complement sum of the buffer, folded to 16 bits
pub fn checksum(data: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }

    // Odd trailing byte is padded with zero bits to a full word
    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u32) << 8;
    }

    // Fold the carries back into 16 bits
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum as u16
}

/// The value to store in a checksum field so the receiver's sum is 0xFFFF
pub fn makesum(data: &[u8]) -> u16 {
    0xFFFF - checksum(data)
}

/// True when a receiver-side sum covers a correctly checksummed buffer
pub fn valid(sum: u16) -> bool {
    sum == 0xFFFF
}

/// Checksum of an IPv4 header serialized with its checksum field zeroed
pub fn ipv4_checksum(header: &Ipv4Header) -> u16 {
    let mut zeroed = header.clone();
    zeroed.checksum = 0;
    checksum(&zeroed.to_bytes())
}

/// The value to store in an IPv4 header's checksum field
pub fn ipv4_makesum(header: &Ipv4Header) -> u16 {
    0xFFFF - ipv4_checksum(header)
}

/// Checksum of a transport segment under the IPv4 pseudo-header
///
/// `segment` is the transport header followed by its payload; pass it with
/// the checksum field zeroed when computing a value to store. `length` is
/// the pseudo-header length field: header plus payload size for TCP, the
/// datagram's own length field for UDP.
pub fn transport_checksum_v4(
    source: Ipv4Addr,
    destination: Ipv4Addr,
    protocol: u8,
    length: u16,
    segment: &[u8],
) -> u16 {
    let mut buffer = BytesMut::with_capacity(12 + segment.len());
    buffer.put_slice(&source.octets());
    buffer.put_slice(&destination.octets());
    buffer.put_u8(0);
    buffer.put_u8(protocol);
    buffer.put_u16(length);
    buffer.put_slice(segment);
    checksum(&buffer)
}

/// Checksum of a transport segment under the IPv6 pseudo-header
pub fn transport_checksum_v6(
    source: Ipv6Addr,
    destination: Ipv6Addr,
    protocol: u8,
    length: u32,
    segment: &[u8],
) -> u16 {
    let mut buffer = BytesMut::with_capacity(40 + segment.len());
    buffer.put_slice(&source.octets());
    buffer.put_slice(&destination.octets());
    buffer.put_u32(length);
    buffer.put_u8(0);
    buffer.put_u8(0);
    buffer.put_u8(0);
    buffer.put_u8(protocol);
    buffer.put_slice(segment);
    checksum(&buffer)
}
