//! Portable node addresses.
//!
//! A [`NodeAddress`] identifies a remote or local node by IP and port. It is a
//! small fixed-size value that compares byte-wise, so it can key ordered
//! containers such as the [`crate::peers::PeerTable`].
//!
//! # Layout
//!
//! ```text
//! family tag   address buffer (MAX_NODE_ADDRESS_BYTES = 18)
//! ┌────────┐ ┌──────────────────────────────────┬──────────────┐
//! │ 0/4/6  │ │ IP field (16 bytes, v4 uses 0..4) │ port (BE, 2) │
//! └────────┘ └──────────────────────────────────┴──────────────┘
//! ```
//!
//! Unused bytes are always zero. The all-zero value with family
//! [`Family::Unspecified`] is the *virtual* node: no real address.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::{host_to_network, network_to_host};

/// Size of the address buffer in bytes: a full IPv6 address plus the port.
pub const MAX_NODE_ADDRESS_BYTES: usize = 18;

const IP_FIELD: Range<usize> = 0..16;
const PORT_FIELD: Range<usize> = 16..18;

/// Address family discriminant stored next to the address buffer.
///
/// Declaration order matches tag order, so the derived ordering sorts the
/// same way as the raw tag byte.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Family {
    /// No address has been set. Only the IP-less states use this.
    #[default]
    Unspecified = 0,
    V4 = 4,
    V6 = 6,
}

impl Family {
    /// Tag byte used on the wire.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Family::tag`].
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Family::Unspecified),
            4 => Some(Family::V4),
            6 => Some(Family::V6),
            _ => None,
        }
    }

    /// Number of leading bytes of the IP field this family uses.
    #[inline]
    pub fn ip_len(self) -> usize {
        match self {
            Family::Unspecified => 0,
            Family::V4 => 4,
            Family::V6 => 16,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Unspecified => write!(f, "unspecified"),
            Family::V4 => write!(f, "ipv4"),
            Family::V6 => write!(f, "ipv6"),
        }
    }
}

/// Network address (IP + port) of a node.
///
/// Equality and ordering compare the family tag, then the address buffer
/// byte by byte. That is the same as `memcmp` over `tag ‖ buffer`, a strict
/// total order.
///
/// # Example
///
/// ```rust
/// use nodecore::NodeAddress;
///
/// let mut addr = NodeAddress::new();
/// assert!(addr.is_virtual());
///
/// addr.set_ip("10.0.0.7").unwrap();
/// addr.set_port(4500);
/// assert_eq!(addr.print(), "10.0.0.7:4500");
/// ```
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(try_from = "RawNodeAddress")]
pub struct NodeAddress {
    family: Family,
    address: [u8; MAX_NODE_ADDRESS_BYTES],
}

/// Serialized shape of a [`NodeAddress`], checked before it becomes one.
#[derive(Deserialize)]
struct RawNodeAddress {
    family: Family,
    address: [u8; MAX_NODE_ADDRESS_BYTES],
}

impl TryFrom<RawNodeAddress> for NodeAddress {
    type Error = Error;

    fn try_from(raw: RawNodeAddress) -> Result<Self> {
        NodeAddress::from_raw_parts(raw.family, raw.address)
    }
}

impl NodeAddress {
    /// The virtual node: every byte zero, no family.
    pub const VIRTUAL: NodeAddress = NodeAddress::new();

    /// Create a virtual node address.
    #[inline]
    pub const fn new() -> Self {
        Self {
            family: Family::Unspecified,
            address: [0; MAX_NODE_ADDRESS_BYTES],
        }
    }

    /// Build an address from raw network-order IP octets.
    ///
    /// Accepts exactly 4 (IPv4) or 16 (IPv6) octets. Anything else, including
    /// input longer than the IP field, is rejected.
    pub fn from_octets(octets: &[u8], port: u16) -> Result<Self> {
        let ip = match octets.len() {
            4 => {
                let mut v4 = [0u8; 4];
                v4.copy_from_slice(octets);
                IpAddr::from(v4)
            }
            16 => {
                let mut v6 = [0u8; 16];
                v6.copy_from_slice(octets);
                IpAddr::from(v6)
            }
            n => {
                return Err(Error::invalid(format!(
                    "expected 4 or 16 IP octets, got {}",
                    n
                )))
            }
        };
        Ok(SocketAddr::new(ip, port).into())
    }

    /// Parse `ip` and combine it with `port`.
    pub fn with_ip_port(ip: &str, port: u16) -> Result<Self> {
        let mut addr = Self::new();
        addr.set_ip(ip)?;
        addr.set_port(port);
        Ok(addr)
    }

    /// Rebuild an address from its stored parts, checking canonical padding.
    pub(crate) fn from_raw_parts(
        family: Family,
        address: [u8; MAX_NODE_ADDRESS_BYTES],
    ) -> Result<Self> {
        let used = family.ip_len();
        if address[used..IP_FIELD.end].iter().any(|&b| b != 0) {
            return Err(Error::invalid(format!(
                "non-zero padding after {} IP bytes for family {}",
                used, family
            )));
        }
        Ok(Self { family, address })
    }

    /// Parse a textual IPv4 or IPv6 address into the IP field.
    ///
    /// The input is validated before anything is written, so on error the
    /// address is unchanged. The port is kept.
    pub fn set_ip(&mut self, ip: &str) -> Result<()> {
        let parsed = ip
            .parse::<IpAddr>()
            .map_err(|_| Error::invalid(format!("unparsable IP {:?}", ip)))?;
        self.set_ip_addr(parsed);
        Ok(())
    }

    /// Store `ip` in the IP field, zeroing whatever the previous family used.
    pub fn set_ip_addr(&mut self, ip: IpAddr) {
        self.address[IP_FIELD].fill(0);
        match ip {
            IpAddr::V4(v4) => {
                self.family = Family::V4;
                self.address[..4].copy_from_slice(&v4.octets());
            }
            IpAddr::V6(v6) => {
                self.family = Family::V6;
                self.address[IP_FIELD].copy_from_slice(&v6.octets());
            }
        }
    }

    /// IP part of the address. The virtual node reports `0.0.0.0`.
    pub fn ip(&self) -> IpAddr {
        match self.family {
            Family::Unspecified => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Family::V4 => IpAddr::V4(Ipv4Addr::new(
                self.address[0],
                self.address[1],
                self.address[2],
                self.address[3],
            )),
            Family::V6 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&self.address[IP_FIELD]);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
        }
    }

    /// Canonical text of the IP part (dotted decimal or RFC 5952).
    pub fn ip_string(&self) -> String {
        self.ip().to_string()
    }

    /// Store a host-order port.
    #[inline]
    pub fn set_port(&mut self, port: u16) {
        self.address[PORT_FIELD].copy_from_slice(&host_to_network(port));
    }

    /// Host-order port.
    #[inline]
    pub fn port(&self) -> u16 {
        network_to_host([self.address[PORT_FIELD.start], self.address[PORT_FIELD.start + 1]])
    }

    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }

    #[inline]
    pub fn is_ipv4(&self) -> bool {
        self.family == Family::V4
    }

    #[inline]
    pub fn is_ipv6(&self) -> bool {
        self.family == Family::V6
    }

    /// Address in the form the standard socket APIs take.
    ///
    /// Family `Unspecified` has no socket form and collapses to
    /// `0.0.0.0:port`, so this is lossy for the virtual node and port-only
    /// addresses. Use [`NodeAddress::print`] or the wire codec to keep identity.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip(), self.port())
    }

    /// Raw address buffer (IP field then network-order port).
    #[inline]
    pub fn as_bytes(&self) -> &[u8; MAX_NODE_ADDRESS_BYTES] {
        &self.address
    }

    /// Human-readable `ip:port` (`[ip]:port` for IPv6, `*:port` without a
    /// family). Parses back to the same address.
    pub fn print(&self) -> String {
        self.to_string()
    }

    /// True only for the all-zero virtual node.
    #[inline]
    pub fn is_virtual(&self) -> bool {
        *self == Self::VIRTUAL
    }

    /// Wildcard bind address: unspecified IP of a concrete family, port 0.
    ///
    /// The virtual node has no family and is never "any".
    pub fn is_any(&self) -> bool {
        self.family != Family::Unspecified && self.ip().is_unspecified() && self.port() == 0
    }

    /// Whether the address names this host.
    ///
    /// True for the virtual node, `127.0.0.0/8`, `::1` and IPv4-mapped
    /// loopback. The port is ignored.
    pub fn is_local(&self) -> bool {
        if self.is_virtual() {
            return true;
        }
        match self.ip() {
            IpAddr::V4(v4) => v4.is_loopback(),
            IpAddr::V6(v6) => {
                v6.is_loopback() || v6.to_ipv4_mapped().map_or(false, |v4| v4.is_loopback())
            }
        }
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            Family::Unspecified => write!(f, "*:{}", self.port()),
            Family::V4 | Family::V6 => self.socket_addr().fmt(f),
        }
    }
}

/// Accepts `ip:port`, `[ipv6]:port`, a bare IP (port 0), or `*:port` / `*`
/// for an address with no IP.
impl FromStr for NodeAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(rest) = s.strip_prefix('*') {
            let port = if rest.is_empty() {
                0
            } else {
                rest.strip_prefix(':')
                    .and_then(|p| p.parse::<u16>().ok())
                    .ok_or_else(|| Error::invalid(format!("unparsable node address {:?}", s)))?
            };
            let mut addr = Self::new();
            addr.set_port(port);
            return Ok(addr);
        }
        if let Ok(sock) = s.parse::<SocketAddr>() {
            return Ok(sock.into());
        }
        s.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, 0).into())
            .map_err(|_| Error::invalid(format!("unparsable node address {:?}", s)))
    }
}

impl From<SocketAddr> for NodeAddress {
    fn from(sock: SocketAddr) -> Self {
        let mut addr = Self::new();
        addr.set_ip_addr(sock.ip());
        addr.set_port(sock.port());
        addr
    }
}

impl From<SocketAddrV4> for NodeAddress {
    fn from(sock: SocketAddrV4) -> Self {
        SocketAddr::V4(sock).into()
    }
}

/// Flow info and scope id are not part of node identity and are dropped.
impl From<SocketAddrV6> for NodeAddress {
    fn from(sock: SocketAddrV6) -> Self {
        SocketAddr::new(IpAddr::V6(*sock.ip()), sock.port()).into()
    }
}

impl From<NodeAddress> for SocketAddr {
    fn from(addr: NodeAddress) -> Self {
        addr.socket_addr()
    }
}
