//! Core library for portable node addresses.
//!
//! This crate provides:
//! - `NodeAddress`, a fixed-size IP + port value usable as an ordered key
//! - Canonical host/network byte-order conversion and a wire codec
//! - Checksummed address packets with pluggable checksum and cipher
//! - An ordered, thread-safe peer table

pub mod error;
pub mod network;
pub mod node;
pub mod packet;
pub mod peers;

pub use error::{Error, Result};
pub use node::{Family, NodeAddress, MAX_NODE_ADDRESS_BYTES};
pub use packet::{Checksum, PacketCipher, Xxh3Checksum};
pub use peers::PeerTable;
