//! pktstack Core Library
//!
//! This crate provides the shared foundation for the pktstack packet codec:
//! error handling, common value types, and the numeric tables (ether types,
//! IP protocol numbers, address families, pcap datalink types) that drive
//! layer dispatch.

pub mod dlt;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use dlt::LinkType;
pub use error::{Error, Result};
pub use types::{ethertypes, family, ipproto, MacAddr};
