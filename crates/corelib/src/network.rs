//! Byte order and wire encoding for node addresses.
//!
//! The port is the only multi-byte field in a [`NodeAddress`]. It is stored
//! in network byte order and every read or write goes through
//! [`host_to_network`] / [`network_to_host`].

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};
use crate::node::{Family, NodeAddress, MAX_NODE_ADDRESS_BYTES};

/// Encoded size of a node address: family tag plus the address buffer.
pub const WIRE_LEN: usize = 1 + MAX_NODE_ADDRESS_BYTES;

/// Host-order `u16` to big-endian bytes.
#[inline]
pub fn host_to_network(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

/// Big-endian bytes to a host-order `u16`.
#[inline]
pub fn network_to_host(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

/// Append `addr` to `buf` as `tag ‖ buffer` ([`WIRE_LEN`] bytes).
///
/// Encoded addresses sort the same way as the addresses themselves.
pub fn encode<B: BufMut>(addr: &NodeAddress, buf: &mut B) {
    buf.put_u8(addr.family().tag());
    buf.put_slice(addr.as_bytes());
}

/// Read one address written by [`encode`].
///
/// Fails on short input, an unknown family tag, or non-zero padding.
pub fn decode<B: Buf>(buf: &mut B) -> Result<NodeAddress> {
    if buf.remaining() < WIRE_LEN {
        return Err(Error::invalid(format!(
            "need {} bytes, have {}",
            WIRE_LEN,
            buf.remaining()
        )));
    }
    let tag = buf.get_u8();
    let family =
        Family::from_tag(tag).ok_or_else(|| Error::invalid(format!("unknown family tag {}", tag)))?;
    let mut address = [0u8; MAX_NODE_ADDRESS_BYTES];
    buf.copy_to_slice(&mut address);
    NodeAddress::from_raw_parts(family, address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_byte_order_is_host_independent() {
        assert_eq!(host_to_network(0x1234), [0x12, 0x34]);
        assert_eq!(host_to_network(80), [0x00, 0x50]);
        assert_eq!(network_to_host([0xAB, 0xCD]), 0xABCD);
        assert_eq!(network_to_host(host_to_network(u16::MAX)), u16::MAX);
    }

    #[test]
    fn test_encode_layout() {
        let addr = NodeAddress::with_ip_port("1.2.3.4", 0x0102).unwrap();
        let mut buf = BytesMut::new();
        encode(&addr, &mut buf);
        assert_eq!(buf.len(), WIRE_LEN);
        assert_eq!(buf[0], 4);
        assert_eq!(&buf[1..5], &[1, 2, 3, 4]);
        assert_eq!(&buf[17..19], &[0x01, 0x02]);
    }

    #[test]
    fn test_decode_consumes_exactly_one_address() {
        let a = NodeAddress::with_ip_port("10.0.0.1", 1).unwrap();
        let b = NodeAddress::with_ip_port("fe80::1", 2).unwrap();
        let mut buf = BytesMut::new();
        encode(&a, &mut buf);
        encode(&b, &mut buf);

        let mut reader = buf.freeze();
        assert_eq!(decode(&mut reader).unwrap(), a);
        assert_eq!(decode(&mut reader).unwrap(), b);
        assert!(decode(&mut reader).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        // Unknown family tag
        let mut raw = [0u8; WIRE_LEN];
        raw[0] = 9;
        assert!(decode(&mut &raw[..]).is_err());

        // IPv4 with bytes past the first four
        let mut raw = [0u8; WIRE_LEN];
        raw[0] = 4;
        raw[1] = 10;
        raw[8] = 1;
        assert!(decode(&mut &raw[..]).is_err());

        // Family unspecified but an IP present
        let mut raw = [0u8; WIRE_LEN];
        raw[1] = 127;
        assert!(decode(&mut &raw[..]).is_err());

        // Truncated
        assert!(decode(&mut &raw[..WIRE_LEN - 1]).is_err());
    }

    #[test]
    fn test_virtual_node_decodes() {
        let raw = [0u8; WIRE_LEN];
        let addr = decode(&mut &raw[..]).unwrap();
        assert!(addr.is_virtual());
    }
}
