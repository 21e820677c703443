//! Checksummed (and optionally encrypted) address packets.
//!
//! Higher layers that ship a [`NodeAddress`] over the wire frame it as
//!
//! ```text
//! ┌──────────────────────────┬──────────────────┐
//! │ encoded address (19 B)   │ checksum (u32 BE)│
//! └──────────────────────────┴──────────────────┘
//! ```
//!
//! and may encrypt the whole frame in place. The checksum and the cipher are
//! pluggable; only [`Xxh3Checksum`] ships with this crate.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{trace, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::error::{Error, Result};
use crate::network::{self, WIRE_LEN};
use crate::node::NodeAddress;

/// Length of a sealed address packet.
pub const SEALED_LEN: usize = WIRE_LEN + 4;

/// Checksum over an arbitrary buffer.
pub trait Checksum: Send + Sync {
    /// Checksum of `buf`.
    fn checksum(&self, buf: &[u8]) -> u32;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Symmetric in-place packet encryption. Length-preserving.
pub trait PacketCipher: Send + Sync {
    fn encrypt(&self, packet: &mut [u8]);
    fn decrypt(&self, packet: &mut [u8]);
}

/// Low 32 bits of XXH3-64.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Checksum;

impl Checksum for Xxh3Checksum {
    fn checksum(&self, buf: &[u8]) -> u32 {
        xxh3_64(buf) as u32
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}

/// Encode `addr`, append its checksum, and encrypt if a cipher is given.
pub fn seal(
    addr: &NodeAddress,
    checksum: &dyn Checksum,
    cipher: Option<&dyn PacketCipher>,
) -> Bytes {
    let mut buf = BytesMut::with_capacity(SEALED_LEN);
    network::encode(addr, &mut buf);
    let sum = checksum.checksum(&buf);
    buf.put_u32(sum);
    if let Some(cipher) = cipher {
        cipher.encrypt(&mut buf);
    }
    trace!(node = %addr, checksum = checksum.name(), sum, "sealed address packet");
    buf.freeze()
}

/// Reverse of [`seal`].
pub fn open(
    packet: &[u8],
    checksum: &dyn Checksum,
    cipher: Option<&dyn PacketCipher>,
) -> Result<NodeAddress> {
    if packet.len() != SEALED_LEN {
        return Err(Error::invalid(format!(
            "address packet must be {} bytes, got {}",
            SEALED_LEN,
            packet.len()
        )));
    }
    let mut buf = BytesMut::from(packet);
    if let Some(cipher) = cipher {
        cipher.decrypt(&mut buf);
    }

    let (body, mut trailer) = buf.split_at(WIRE_LEN);
    let expected = trailer.get_u32();
    let actual = checksum.checksum(body);
    if actual != expected {
        warn!(
            checksum = checksum.name(),
            expected, actual, "address packet checksum mismatch"
        );
        return Err(Error::invalid("checksum mismatch"));
    }

    let mut body = body;
    network::decode(&mut body)
}
